//! Tab type entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Default threshold below which stock is flagged as low.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

/// A category of lendable item.
///
/// The same row serves as the consumable stock counter: consumable tab
/// types carry a positive `stock_remaining`, device-tracked types count
/// their units in `tablet_devices` instead.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TabType {
    /// Unique identifier.
    pub id: Uuid,
    /// Unique display name.
    pub name: String,
    /// Maximum checkouts per user per local day.
    pub daily_limit_per_user: i32,
    /// Consumable units left in the pool. Never negative.
    pub stock_remaining: i32,
    /// Level at or below which the dashboard flags the stock.
    pub low_stock_threshold: i32,
    /// When the tab type was created.
    pub created_at: DateTime<Utc>,
}

impl TabType {
    /// Whether the remaining stock is at or below the threshold.
    pub fn is_low_stock(&self) -> bool {
        self.stock_remaining <= self.low_stock_threshold
    }
}

/// Data required to create a new tab type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTabType {
    /// Unique display name.
    pub name: String,
    /// Per-user daily limit.
    pub daily_limit_per_user: i32,
    /// Initial stock.
    pub stock_remaining: i32,
    /// Low-stock threshold.
    pub low_stock_threshold: i32,
}
