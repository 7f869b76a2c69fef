//! Tablet device entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::DeviceStatus;

/// A serialized physical unit belonging to a tab type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TabletDevice {
    /// Unique identifier.
    pub id: Uuid,
    /// Tab type this unit belongs to.
    pub tab_type_id: Uuid,
    /// Manufacturer serial number.
    pub serial_number: String,
    /// Code printed on the device label for scanning.
    pub scan_code: String,
    /// Lifecycle state.
    pub status: DeviceStatus,
    /// Last reported physical condition.
    pub condition: String,
    /// Current holder; set iff the status is held.
    pub assigned_to: Option<Uuid>,
    /// When the current holder received the device.
    pub assigned_at: Option<DateTime<Utc>>,
    /// When the device was provisioned.
    pub created_at: DateTime<Utc>,
}

impl TabletDevice {
    /// Whether `user_id` currently holds this device.
    pub fn is_held_by(&self, user_id: Uuid) -> bool {
        self.status.is_held() && self.assigned_to == Some(user_id)
    }
}

/// Data required to provision a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDevice {
    /// Owning tab type.
    pub tab_type_id: Uuid,
    /// Serial number.
    pub serial_number: String,
    /// Scan label code.
    pub scan_code: String,
    /// Initial condition text.
    pub condition: String,
}
