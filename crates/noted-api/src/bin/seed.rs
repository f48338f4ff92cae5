//! Reset the notes table to the sample data set.
//!
//! Connects to `DATABASE_URL`, runs migrations, deletes every note, and
//! inserts the notes from `noted_db::seed::sample_notes`.

use tracing::info;

use noted_api::{init_tracing, LogSettings, ServerConfig};
use noted_db::{seed::seed_notes, Database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing(&LogSettings::from_env());

    let config = ServerConfig::from_env();
    info!("Starting database seed process");

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let removed = db.clear_notes().await?;
    info!(removed, "Cleared existing notes");

    let created = seed_notes(&db.notes).await?;
    info!(
        created = created.len(),
        "Sample data inserted; browse http://{}:{}/api/notes or /api-docs",
        config.host,
        config.port
    );

    db.close().await;
    Ok(())
}
