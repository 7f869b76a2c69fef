//! Server start command.

use clap::Args;

use tabaudit_core::config::AppConfig;
use tabaudit_core::error::AppError;
use tabaudit_database::migration::run_migrations;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the bind port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Skip applying pending migrations on startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let pool = super::create_db_pool(&config).await?;
    if !args.no_migrate {
        run_migrations(&pool).await?;
    }

    tabaudit_api::run_server(config, pool).await
}
