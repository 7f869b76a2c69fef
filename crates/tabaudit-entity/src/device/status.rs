//! Device status enumeration and transitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::condition::ReturnCondition;

/// Lifecycle state of a physical device.
///
/// ```text
/// available ──assign──▶ assigned ──initiate──▶ return_pending ──verify──▶ available | repair
///                                                   │  ▲
///                                                   └──┘ initiate again
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "device_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    /// In the pool, can be assigned.
    Available,
    /// Held by a user.
    Assigned,
    /// Held by a user who has asked to hand it back.
    ReturnPending,
    /// Returned in a condition other than good.
    Repair,
}

impl DeviceStatus {
    /// Whether a user holds the device in this state.
    pub fn is_held(&self) -> bool {
        matches!(self, Self::Assigned | Self::ReturnPending)
    }

    /// Whether the device may be assigned.
    pub fn can_assign(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// Whether a return may be initiated. Re-initiating from
    /// `return_pending` is allowed and issues another code.
    pub fn can_initiate_return(&self) -> bool {
        self.is_held()
    }

    /// Whether a return code may be verified. Only an initiated return
    /// can be completed.
    pub fn can_verify_return(&self) -> bool {
        matches!(self, Self::ReturnPending)
    }

    /// State reached after a verified return in the given condition.
    pub fn after_return(condition: &ReturnCondition) -> Self {
        if condition.is_good() {
            Self::Available
        } else {
            Self::Repair
        }
    }

    /// Return the status as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Assigned => "assigned",
            Self::ReturnPending => "return_pending",
            Self::Repair => "repair",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeviceStatus {
    type Err = tabaudit_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "assigned" => Ok(Self::Assigned),
            "return_pending" => Ok(Self::ReturnPending),
            "repair" => Ok(Self::Repair),
            _ => Err(tabaudit_core::AppError::validation(format!(
                "Invalid device status: '{s}'. Expected one of: available, assigned, return_pending, repair"
            ))),
        }
    }
}
