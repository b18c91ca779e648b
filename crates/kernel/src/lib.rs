pub mod module;
pub mod registry;
pub mod settings;
pub mod state;

pub use libris_db::TableSchema;
pub use module::{InitCtx, Module};
pub use registry::ModuleRegistry;
pub use state::AppState;
