//! Aggregation row types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::device::DeviceStatus;

/// A tab type the caller holds units of.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PossessedTab {
    /// Tab type identifier.
    pub tab_type_id: Uuid,
    /// Tab type name.
    pub tab_name: String,
    /// Net units held (always positive).
    pub quantity: i64,
}

/// A device currently held.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HeldDevice {
    /// Device identifier.
    pub device_id: Uuid,
    /// Serial number.
    pub serial_number: String,
    /// Tab type name.
    pub tab_name: String,
    /// `assigned` or `return_pending`.
    pub status: DeviceStatus,
    /// When the device was handed over.
    pub assigned_at: Option<DateTime<Utc>>,
}

/// A positive consumable balance of one user for one tab type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActiveLoan {
    /// Employee number.
    pub employee_id: String,
    /// Display name.
    pub username: String,
    /// Tab type name.
    pub tab_name: String,
    /// Net units held.
    pub quantity: i64,
}

/// Units taken per tab type within a period.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TabUsageBreakdown {
    /// Tab type name.
    pub tab_name: String,
    /// Units left in the pool.
    pub stock_remaining: i32,
    /// Units taken today.
    pub used_today: i64,
    /// Units taken this month.
    pub used_this_month: i64,
}

/// Aggregate counts of units taken.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, FromRow)]
pub struct DailyUsage {
    /// Units taken since the start of the local day.
    pub used_today: i64,
    /// Units taken since the start of the local month.
    pub used_this_month: i64,
}
