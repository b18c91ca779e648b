//! Libris application library
//!
//! Domain modules for users, books and reviews, plus the bootstrap that wires
//! them to the store and the HTTP server.

use anyhow::Context;
use libris_db::Database;
use libris_kernel::{settings::Settings, AppState, InitCtx, ModuleRegistry};

pub mod modules;

/// Build a registry holding every domain module.
pub fn registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);
    registry
}

/// Connect to the configured store and create any missing tables.
pub async fn connect(settings: &Settings, registry: &ModuleRegistry) -> anyhow::Result<Database> {
    let db = Database::connect(&settings.database)
        .await
        .with_context(|| format!("failed to connect to database '{}'", settings.database.url))?;

    db.bootstrap(&registry.collect_schema())
        .await
        .context("failed to bootstrap schema")?;

    Ok(db)
}

/// Run the server until shutdown, then stop modules and close the pool.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = registry();
    let db = connect(&settings, &registry).await?;

    let ctx = InitCtx {
        settings: &settings,
        db: &db,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let state = AppState::new(db.clone(), settings.clone());
    let served = libris_http::start_server(&registry, state).await;

    registry.stop_modules().await?;
    db.close().await;

    served
}
