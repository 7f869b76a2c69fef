//! Audit action tags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of privileged mutation recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// Stock added or a tab type created.
    #[serde(rename = "Inventory Update")]
    InventoryUpdate,
    /// A per-user daily limit was edited.
    #[serde(rename = "Limit Change")]
    LimitChange,
    /// A physical device was registered.
    #[serde(rename = "Device Provisioned")]
    DeviceProvisioned,
    /// An assignment code was issued.
    #[serde(rename = "OTP Issued")]
    OtpIssued,
}

impl AuditAction {
    /// The tag stored in `audit_log.action_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InventoryUpdate => "Inventory Update",
            Self::LimitChange => "Limit Change",
            Self::DeviceProvisioned => "Device Provisioned",
            Self::OtpIssued => "OTP Issued",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = tabaudit_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "inventory update" => Ok(Self::InventoryUpdate),
            "limit change" => Ok(Self::LimitChange),
            "device provisioned" => Ok(Self::DeviceProvisioned),
            "otp issued" => Ok(Self::OtpIssued),
            _ => Err(tabaudit_core::AppError::validation(format!(
                "Invalid audit action: '{s}'"
            ))),
        }
    }
}
