//! Schema migration commands.

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use tabaudit_core::config::AppConfig;
use tabaudit_core::error::AppError;
use tabaudit_database::{db_error, migration};

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub command: MigrateCommand,
}

#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Apply pending migrations
    Run,
    /// Show applied migrations
    Status,
    /// Drop the ledger schema and rebuild it from scratch
    Reset {
        /// Do not ask for confirmation
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Serialize, Tabled, sqlx::FromRow)]
struct AppliedMigration {
    #[tabled(rename = "Version")]
    version: i64,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Applied")]
    installed_on: DateTime<Utc>,
}

pub async fn execute(
    args: &MigrateArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;

    match &args.command {
        MigrateCommand::Run => {
            migration::run_migrations(&pool).await?;
            output::print_success("Ledger schema is up to date.");
        }
        MigrateCommand::Status => {
            let applied = sqlx::query_as::<_, AppliedMigration>(
                "SELECT version, description, installed_on FROM _sqlx_migrations \
                 WHERE success ORDER BY version",
            )
            .fetch_all(&pool)
            .await
            .map_err(|e| db_error("Failed to read migration history", e))?;

            if applied.is_empty() {
                output::print_warning("No migrations applied yet.");
            } else {
                output::print_list(&applied, format);
            }
        }
        MigrateCommand::Reset { force } => {
            if !force {
                let confirmed = dialoguer::Confirm::new()
                    .with_prompt(
                        "Every tab, device, ledger entry and audit record will be deleted. Continue?",
                    )
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Prompt failed: {e}")))?;

                if !confirmed {
                    output::print_warning("Reset aborted.");
                    return Ok(());
                }
            }

            migration::reset_database(&pool).await?;
            output::print_success("Ledger schema dropped and rebuilt.");
        }
    }

    Ok(())
}
