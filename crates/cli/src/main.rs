use anyhow::Context;
use clap::{Parser, Subcommand};
use libris_kernel::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "libris", version, about = "Personal library API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Create any missing tables, then exit
    InitDb,
    /// Print the table DDL in bootstrap order
    Schema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Schema => {
            for (module, table) in libris_app::registry().collect_schema() {
                println!("-- {module}: {}", table.id);
                println!("{}", table.ddl.trim());
            }
            Ok(())
        }
        Command::InitDb => {
            let settings = load_settings()?;
            let registry = libris_app::registry();
            let db = libris_app::connect(&settings, &registry).await?;
            tracing::info!(db = %settings.database.url, "schema is up to date");
            db.close().await;
            Ok(())
        }
        Command::Serve => {
            let settings = load_settings()?;
            tracing::info!(
                env = ?settings.environment,
                db = %settings.database.url,
                "libris bootstrap starting"
            );
            libris_app::run(settings).await
        }
    }
}

fn load_settings() -> anyhow::Result<Settings> {
    let settings = Settings::load().with_context(|| "failed to load Libris settings")?;
    libris_telemetry::init(&settings.telemetry)?;
    Ok(settings)
}
