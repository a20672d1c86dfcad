use asset_ledger::{
    config::{database, profiles},
    errors::Result,
};
use dotenvy::dotenv;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Connect and make sure every table exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed asset profiles and accounts
    let config_path = profiles::config_path();
    if Path::new(&config_path).exists() {
        let config = profiles::load_config(&config_path)
            .inspect_err(|e| error!("Failed to load {}: {}", config_path, e))?;
        profiles::seed_from_config(&db, &config)
            .await
            .inspect(|_| info!("Seed data from {} applied.", config_path))
            .inspect_err(|e| error!("Failed to seed from {}: {}", config_path, e))?;
    } else {
        warn!("No seed file at {}; skipping profile seeding.", config_path);
    }

    db.close().await?;
    Ok(())
}
