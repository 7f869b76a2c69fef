//! Assignment log entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Whether an assignment is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "assignment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    /// The device is still out.
    Active,
    /// The device was handed back and verified.
    Returned,
}

/// One device handover. Created `active`; the only later change is the
/// flip to `returned` with its timestamp and condition.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssignmentLog {
    /// Unique identifier.
    pub id: Uuid,
    /// Receiving user.
    pub user_id: Uuid,
    /// Device handed over.
    pub device_id: Uuid,
    /// Tab type of the device at handover.
    pub tab_type_id: Uuid,
    /// Open or closed.
    pub status: AssignmentStatus,
    /// When the device was handed over.
    pub issued_at: DateTime<Utc>,
    /// When the return was verified.
    pub returned_at: Option<DateTime<Utc>>,
    /// Condition recorded at return.
    pub return_condition: Option<String>,
    /// Client address at handover.
    pub ip_address: Option<String>,
    /// Client user agent at handover.
    pub device_info: Option<String>,
}

/// An assignment joined with user and device names for dashboards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssignmentLogView {
    /// Assignment identifier.
    pub id: Uuid,
    /// Employee number of the holder.
    pub employee_id: String,
    /// Display name of the holder.
    pub username: String,
    /// Device serial number.
    pub serial_number: String,
    /// Tab type name.
    pub tab_name: String,
    /// Open or closed.
    pub status: AssignmentStatus,
    /// When the device was handed over.
    pub issued_at: DateTime<Utc>,
    /// When the return was verified.
    pub returned_at: Option<DateTime<Utc>>,
}
