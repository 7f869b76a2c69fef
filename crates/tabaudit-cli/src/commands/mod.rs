//! CLI command definitions and dispatch.

pub mod audit;
pub mod device;
pub mod migrate;
pub mod otp;
pub mod seed;
pub mod serve;
pub mod tab;
pub mod token;
pub mod user;

use clap::{Parser, Subcommand};

use tabaudit_api::AppState;
use tabaudit_core::config::AppConfig;
use tabaudit_core::error::AppError;
use tabaudit_database::DatabasePool;
use tabaudit_service::RequestContext;

use crate::output::OutputFormat;

/// TabAudit: lending ledger for consumable tabs and tablet devices
#[derive(Debug, Parser)]
#[command(name = "tabaudit", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file, without extension
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay loaded next to the base file
    #[arg(short, long, env = "TABAUDIT_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Employee ID of the admin that admin commands are attributed to
    #[arg(long = "as", global = true)]
    pub acting_admin: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the TabAudit server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User management
    User(user::UserArgs),
    /// Development bearer tokens
    Token(token::TokenArgs),
    /// Tab type stock and limits
    Tab(tab::TabArgs),
    /// Physical devices
    Device(device::DeviceArgs),
    /// Assignment codes
    Otp(otp::OtpArgs),
    /// Audit log
    Audit(audit::AuditArgs),
    /// Populate sample tab types
    Seed,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load_from(&self.config, &self.env)?;

        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config, self.format).await,
            Commands::User(args) => user::execute(args, &config, self.format).await,
            Commands::Token(args) => token::execute(args, &config).await,
            Commands::Tab(args) => tab::execute(args, self.session(config).await?, self.format).await,
            Commands::Device(args) => {
                device::execute(args, self.session(config).await?, self.format).await
            }
            Commands::Otp(args) => otp::execute(args, self.session(config).await?, self.format).await,
            Commands::Audit(args) => {
                audit::execute(args, self.session(config).await?, self.format).await
            }
            Commands::Seed => seed::execute(self.session(config).await?).await,
        }
    }

    /// Wire services and resolve the acting admin.
    async fn session(&self, config: AppConfig) -> Result<AdminSession, AppError> {
        let pool = create_db_pool(&config).await?;
        let state = AppState::new(config, pool)?;

        let ctx = match &self.acting_admin {
            Some(employee_id) => {
                let user = state.user_service.find_by_employee_id(employee_id).await?;
                if !user.is_admin() || !user.is_active() {
                    return Err(AppError::authorization(format!(
                        "'{employee_id}' is not an active admin"
                    )));
                }
                RequestContext::for_user(&user, None, Some("tabaudit-cli".to_string()))
            }
            None => RequestContext::operator(),
        };

        Ok(AdminSession { state, ctx })
    }
}

/// Services plus the admin context that commands run as.
pub struct AdminSession {
    pub state: AppState,
    pub ctx: RequestContext,
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<sqlx::PgPool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}
