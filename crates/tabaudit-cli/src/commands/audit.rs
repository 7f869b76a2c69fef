//! Audit log CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use tabaudit_core::error::AppError;
use tabaudit_core::types::pagination::PageRequest;
use tabaudit_entity::audit::{AuditAction, AuditLogEntry, AuditSearchFilter};

use super::AdminSession;
use crate::output::{self, OutputFormat};

/// Arguments for audit commands
#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Audit subcommand
    #[command(subcommand)]
    pub command: AuditCommand,
}

/// Audit subcommands
#[derive(Debug, Subcommand)]
pub enum AuditCommand {
    /// Search audit log
    Search {
        /// Filter by action, e.g. "limit_change"
        #[arg(short, long)]
        action: Option<String>,
        /// Filter by admin (employee number)
        #[arg(long)]
        admin: Option<String>,
        /// Only the last N days
        #[arg(short, long)]
        days: Option<i64>,
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: i64,
        /// Results per page
        #[arg(short = 'n', long, default_value_t = 50)]
        per_page: i64,
    },
}

/// Audit display row
#[derive(Debug, Serialize, Tabled)]
struct AuditRow {
    /// Time
    time: String,
    /// Admin employee number
    admin: String,
    /// Action
    action: String,
    /// Description
    description: String,
}

impl From<&AuditLogEntry> for AuditRow {
    fn from(e: &AuditLogEntry) -> Self {
        Self {
            time: e.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            admin: output::or_dash(e.admin_employee_id.as_deref()),
            action: e.action_type.clone(),
            description: e.description.clone(),
        }
    }
}

/// Execute audit commands
pub async fn execute(
    args: &AuditArgs,
    session: AdminSession,
    format: OutputFormat,
) -> Result<(), AppError> {
    let AdminSession { state, ctx } = session;

    match &args.command {
        AuditCommand::Search {
            action,
            admin,
            days,
            page,
            per_page,
        } => {
            let admin_id = match admin {
                Some(employee_id) => Some(
                    state
                        .user_service
                        .find_by_employee_id(employee_id)
                        .await?
                        .id,
                ),
                None => None,
            };
            let filter = AuditSearchFilter {
                action: action
                    .as_deref()
                    .map(str::parse::<AuditAction>)
                    .transpose()?,
                admin_id,
                since: days.map(|d| chrono::Utc::now() - chrono::Duration::days(d)),
            };

            let result = state
                .audit_recorder
                .search(&ctx, &filter, PageRequest::new(*page, *per_page))
                .await?;

            let rows: Vec<AuditRow> = result.items.iter().map(AuditRow::from).collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                println!(
                    "Page {} of {} ({} entries)",
                    result.page, result.total_pages, result.total
                );
            }
        }
    }

    Ok(())
}
