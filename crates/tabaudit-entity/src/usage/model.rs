//! Usage log entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::action::LedgerAction;

/// An immutable consumable ledger entry with a signed quantity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UsageLog {
    /// Unique identifier.
    pub id: Uuid,
    /// The user who logged or returned.
    pub user_id: Uuid,
    /// The tab type affected.
    pub tab_type_id: Uuid,
    /// Positive for a checkout, negative for a return.
    pub quantity: i32,
    /// When the entry was written.
    pub timestamp: DateTime<Utc>,
    /// Client address.
    pub ip_address: Option<String>,
    /// Client user agent.
    pub device_info: Option<String>,
}

impl UsageLog {
    /// The action this entry records.
    pub fn action(&self) -> LedgerAction {
        LedgerAction::of_quantity(self.quantity)
    }
}

/// A usage log entry joined with the names needed for display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UsageLogView {
    /// Entry identifier.
    pub id: Uuid,
    /// Employee number of the user.
    pub employee_id: String,
    /// Display name of the user.
    pub username: String,
    /// Name of the tab type.
    pub tab_name: String,
    /// Signed quantity.
    pub quantity: i32,
    /// When the entry was written.
    pub timestamp: DateTime<Utc>,
    /// Client address.
    pub ip_address: Option<String>,
}
