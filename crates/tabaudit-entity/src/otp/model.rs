//! Assignment and return code models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::code::OneTimeCode;

/// An admin-issued code that lets a user take any available device of a
/// tab type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssignmentOtp {
    /// Unique identifier.
    pub id: Uuid,
    /// Tab type the code grants.
    pub tab_type_id: Uuid,
    /// Digits handed to the user.
    pub code: String,
    /// Issuing admin.
    pub created_by: Option<Uuid>,
    /// When the code was issued.
    pub created_at: DateTime<Utc>,
    /// End of validity.
    pub expires_at: DateTime<Utc>,
    /// Whether the code has been redeemed.
    pub is_used: bool,
    /// Redeeming user.
    pub used_by: Option<Uuid>,
    /// When the code was redeemed.
    pub used_at: Option<DateTime<Utc>>,
}

impl OneTimeCode for AssignmentOtp {
    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    fn is_consumed(&self) -> bool {
        self.is_used
    }
}

/// A code proving that a device was physically handed back.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReturnVerification {
    /// Unique identifier.
    pub id: Uuid,
    /// Device being returned.
    pub device_id: Uuid,
    /// Holder at initiation.
    pub user_id: Uuid,
    /// Digits read out at the counter.
    pub code: String,
    /// When the return was initiated.
    pub created_at: DateTime<Utc>,
    /// End of validity.
    pub expires_at: DateTime<Utc>,
    /// Whether the code has been verified.
    pub verified: bool,
    /// When the code was verified.
    pub verified_at: Option<DateTime<Utc>>,
}

impl OneTimeCode for ReturnVerification {
    fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    fn is_consumed(&self) -> bool {
        self.verified
    }
}

/// A device awaiting return together with its newest live code.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PendingReturn {
    /// Device identifier.
    pub device_id: Uuid,
    /// Device serial number.
    pub serial_number: String,
    /// Holder's employee number.
    pub employee_id: String,
    /// Holder's display name.
    pub username: String,
    /// Newest unverified code.
    pub code: String,
    /// When that code expires.
    pub expires_at: DateTime<Utc>,
}
