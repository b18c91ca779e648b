use std::sync::Arc;

use libris_db::Database;

use crate::settings::Settings;

/// Handle injected into every request handler through axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        Self {
            db,
            settings: Arc::new(settings),
        }
    }
}
