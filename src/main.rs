//! TabAudit Server: inventory ledger for consumable tabs and tablet devices.
//!
//! Main entry point that wires all crates together and starts the server.

use tracing_subscriber::{EnvFilter, fmt};

use tabaudit_core::config::AppConfig;
use tabaudit_core::error::AppError;
use tabaudit_database::DatabasePool;
use tabaudit_database::migration::run_migrations;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(code = %e.kind, "Server error: {}", e.message);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let base = std::env::var("TABAUDIT_CONFIG").unwrap_or_else(|_| "config/default".to_string());
    let env = std::env::var("TABAUDIT_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load_from(&base, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting TabAudit v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(db.pool()).await?;

    // ── Step 2: Build state and serve ────────────────────────────
    let result = tabaudit_api::run_server(config, db.pool().clone()).await;

    db.close().await;
    result
}
