//! Tab type stock and limit commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use tabaudit_core::error::{AppError, RuleViolation};
use tabaudit_entity::tab::TabType;

use super::AdminSession;
use crate::output::{self, OutputFormat};

/// Arguments for tab commands
#[derive(Debug, Args)]
pub struct TabArgs {
    #[command(subcommand)]
    pub command: TabCommand,
}

/// Tab subcommands
#[derive(Debug, Subcommand)]
pub enum TabCommand {
    /// Create a tab type or add stock to it
    Add {
        /// Tab type name
        name: String,
        /// Units to add
        #[arg(short, long, default_value_t = 0)]
        quantity: i32,
        /// Daily limit for a new tab type
        #[arg(short, long, default_value_t = 1)]
        limit: i32,
    },
    /// Change the per-user daily limit
    SetLimit {
        /// Tab type ID or name
        tab: String,
        /// New limit
        limit: i32,
    },
    /// List tab types with stock
    List,
}

#[derive(Debug, Serialize, Tabled)]
struct TabRow {
    id: String,
    name: String,
    stock: i32,
    daily_limit: i32,
    low_stock: bool,
}

impl From<&TabType> for TabRow {
    fn from(t: &TabType) -> Self {
        Self {
            id: t.id.to_string(),
            name: t.name.clone(),
            stock: t.stock_remaining,
            daily_limit: t.daily_limit_per_user,
            low_stock: t.is_low_stock(),
        }
    }
}

/// Execute tab commands
pub async fn execute(
    args: &TabArgs,
    session: AdminSession,
    format: OutputFormat,
) -> Result<(), AppError> {
    let AdminSession { state, ctx } = session;

    match &args.command {
        TabCommand::Add {
            name,
            quantity,
            limit,
        } => {
            let update = state
                .inventory_service
                .add_tab(&ctx, name, *quantity, *limit)
                .await?;
            output::print_success(&update.message);
            output::print_kv("New stock", &update.new_stock.to_string());
        }
        TabCommand::SetLimit { tab, limit } => {
            let tab = resolve_tab(&state, &ctx, tab).await?;
            let updated = state
                .inventory_service
                .set_limit(&ctx, tab.id, *limit)
                .await?;
            output::print_success(&format!(
                "Daily limit of '{}' is now {}",
                updated.name, updated.daily_limit_per_user
            ));
        }
        TabCommand::List => {
            let tabs = state.ledger_service.list_tabs(&ctx).await?;
            let rows: Vec<TabRow> = tabs.iter().map(TabRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

/// Find a tab type by ID or exact name.
pub async fn resolve_tab(
    state: &tabaudit_api::AppState,
    ctx: &tabaudit_service::RequestContext,
    key: &str,
) -> Result<TabType, AppError> {
    let id = Uuid::parse_str(key).ok();
    state
        .ledger_service
        .list_tabs(ctx)
        .await?
        .into_iter()
        .find(|t| Some(t.id) == id || t.name == key)
        .ok_or_else(|| AppError::rule(RuleViolation::TabNotFound))
}
