//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use tabaudit_core::error::AppError;
use tabaudit_core::result::AppResult;
use tabaudit_entity::audit::{AuditAction, AuditSearchFilter};
use tabaudit_entity::device::DeviceStatus;
use tabaudit_entity::usage::LedgerAction;
use tabaudit_service::assignment::AssignTarget;

/// Consumable check-in body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckInRequest {
    /// Tab type.
    pub tab_id: Uuid,
    /// Units (default 1).
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    /// `"log"` or `"return"`.
    pub action: LedgerAction,
}

fn default_quantity() -> i32 {
    1
}

/// Device assignment body: either a scanned device or an assignment code.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignRequest {
    /// Serial number or scan code.
    pub device_id: Option<String>,
    /// Assignment code issued by an admin.
    pub otp_code: Option<String>,
}

impl AssignRequest {
    /// Which assignment path the body selects. A code wins when both are
    /// given.
    pub fn into_target(self) -> AppResult<AssignTarget> {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        match (non_blank(self.otp_code), non_blank(self.device_id)) {
            (Some(code), _) => Ok(AssignTarget::Otp(code)),
            (None, Some(device)) => Ok(AssignTarget::Scan(device)),
            (None, None) => Err(AppError::validation(
                "Either device_id or otp_code is required",
            )),
        }
    }
}

/// Return initiation body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InitiateReturnRequest {
    /// Serial number or scan code.
    #[validate(length(min = 1, message = "Device ID is required"))]
    pub device_id: String,
}

/// Return verification body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyReturnRequest {
    /// Serial number or scan code.
    #[validate(length(min = 1, message = "Device ID is required"))]
    pub device_id: String,
    /// Verification code.
    #[validate(length(min = 1, message = "OTP code is required"))]
    pub otp_code: String,
    /// Reported condition; "Good" when absent.
    #[validate(length(max = 100, message = "Condition is too long"))]
    pub condition: Option<String>,
}

/// Assignment code issuance body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateOtpRequest {
    /// Tab type the code grants.
    pub tab_type_id: Uuid,
}

/// Stock addition body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddTabRequest {
    /// Tab type name; created when unknown.
    #[validate(length(min = 1, max = 100, message = "Tab name is required."))]
    pub name: String,
    /// Units to add.
    #[serde(default)]
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,
    /// Daily limit for a newly created tab type.
    #[serde(default = "default_limit")]
    #[validate(range(min = 0, message = "Daily limit cannot be negative"))]
    pub limit: i32,
}

fn default_limit() -> i32 {
    1
}

/// Daily limit edit body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetLimitRequest {
    /// New per-user daily limit.
    #[validate(range(min = 0, message = "Daily limit cannot be negative"))]
    pub daily_limit: i32,
}

/// Device provisioning body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProvisionDeviceRequest {
    /// Owning tab type.
    pub tab_type_id: Uuid,
    /// Serial number.
    #[validate(length(min = 1, max = 100, message = "Serial number is required"))]
    pub serial_number: String,
    /// Label scan code.
    #[validate(length(min = 1, max = 100, message = "Scan code is required"))]
    pub scan_code: String,
    /// Initial condition.
    pub condition: Option<String>,
}

/// `?search=` for the filtered log view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsQuery {
    pub search: Option<String>,
}

/// Device list filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceListQuery {
    pub tab_type_id: Option<Uuid>,
    pub status: Option<String>,
}

impl DeviceListQuery {
    /// Parsed status filter.
    pub fn status(&self) -> AppResult<Option<DeviceStatus>> {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::parse::<DeviceStatus>)
            .transpose()
    }
}

/// Audit search filters. Blank values are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditQuery {
    pub action: Option<String>,
    pub admin_id: Option<String>,
    pub since: Option<DateTime<Utc>>,
}

impl AuditQuery {
    /// Convert into a repository filter.
    pub fn into_filter(self) -> AppResult<AuditSearchFilter> {
        let action = self
            .action
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<AuditAction>)
            .transpose()?;
        let admin_id = self
            .admin_id
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                Uuid::parse_str(s.trim())
                    .map_err(|_| AppError::validation(format!("Invalid admin_id: '{s}'")))
            })
            .transpose()?;
        Ok(AuditSearchFilter {
            action,
            admin_id,
            since: self.since,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_in_defaults_quantity() {
        let req: CheckInRequest = serde_json::from_value(serde_json::json!({
            "tab_id": Uuid::nil(),
            "action": "log"
        }))
        .unwrap();
        assert_eq!(req.quantity, 1);
        assert_eq!(req.action, LedgerAction::Log);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_check_in_rejects_zero_quantity() {
        let req = CheckInRequest {
            tab_id: Uuid::nil(),
            quantity: 0,
            action: LedgerAction::Return,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_assign_target_selection() {
        let scan = AssignRequest {
            device_id: Some("SN-1".to_string()),
            otp_code: Some("  ".to_string()),
        };
        assert_eq!(
            scan.into_target().unwrap(),
            AssignTarget::Scan("SN-1".to_string())
        );

        let otp = AssignRequest {
            device_id: None,
            otp_code: Some("123456".to_string()),
        };
        assert_eq!(
            otp.into_target().unwrap(),
            AssignTarget::Otp("123456".to_string())
        );

        let neither = AssignRequest {
            device_id: None,
            otp_code: None,
        };
        assert!(neither.into_target().is_err());
    }

    #[test]
    fn test_add_tab_defaults() {
        let req: AddTabRequest =
            serde_json::from_value(serde_json::json!({ "name": "iPad" })).unwrap();
        assert_eq!(req.quantity, 0);
        assert_eq!(req.limit, 1);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_audit_query_ignores_blank_values() {
        let filter = AuditQuery {
            action: Some("".to_string()),
            admin_id: Some(" ".to_string()),
            since: None,
        }
        .into_filter()
        .unwrap();
        assert!(filter.action.is_none());
        assert!(filter.admin_id.is_none());

        let filter = AuditQuery {
            action: Some("limit_change".to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.action, Some(AuditAction::LimitChange));
    }
}
