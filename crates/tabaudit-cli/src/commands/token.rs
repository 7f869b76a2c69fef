//! Development bearer token minting.

use std::sync::Arc;

use clap::{Args, Subcommand};

use tabaudit_auth::jwt::JwtEncoder;
use tabaudit_core::config::AppConfig;
use tabaudit_core::error::AppError;
use tabaudit_database::repositories::UserRepository;
use tabaudit_service::UserService;

use crate::output;

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Sign a token for an active user
    Issue {
        /// Employee number
        employee_id: String,
        /// Lifetime in minutes (default from config)
        #[arg(long)]
        ttl_minutes: Option<i64>,
    },
}

/// Execute token commands
pub async fn execute(args: &TokenArgs, config: &AppConfig) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let users = UserService::new(Arc::new(UserRepository::new(pool)));
    let encoder = JwtEncoder::new(&config.auth);

    match &args.command {
        TokenCommand::Issue {
            employee_id,
            ttl_minutes,
        } => {
            let user = users.find_by_employee_id(employee_id).await?;
            if !user.is_active() {
                output::print_warning(&format!(
                    "'{employee_id}' is inactive; the token will be rejected"
                ));
            }
            let token = match ttl_minutes {
                Some(minutes) => {
                    encoder.issue_with_ttl(&user, chrono::Duration::minutes(*minutes))?
                }
                None => encoder.issue(&user)?,
            };
            println!("{token}");
        }
    }

    Ok(())
}
