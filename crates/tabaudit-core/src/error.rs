//! Unified application error types for TabAudit.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Business-rule failures of the ledger
//! and the device state machine carry a typed [`RuleViolation`] so callers
//! can match on the exact rule instead of parsing messages.

use std::fmt;
use thiserror::Error;

/// Why a one-time code was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpRejection {
    /// No live code with this value exists.
    NotFound,
    /// The code exists but its expiry has passed.
    Expired,
    /// The code was already consumed.
    AlreadyUsed,
}

impl fmt::Display for OtpRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Expired => write!(f, "expired"),
            Self::AlreadyUsed => write!(f, "already used"),
        }
    }
}

/// A business rule of the inventory ledger or the assignment state machine
/// that refused an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum RuleViolation {
    /// Remaining stock cannot cover the requested quantity.
    InsufficientStock,
    /// The per-user daily limit for the tab type is reached.
    DailyLimitExceeded {
        /// The configured limit.
        limit: i32,
    },
    /// The user's net balance cannot cover the return.
    NothingToReturn,
    /// The tab type does not exist.
    TabNotFound,
    /// No device matches the given serial number or scan code.
    DeviceNotFound,
    /// The device is not in the `available` state.
    DeviceUnavailable,
    /// The tab type has no available device.
    NoDeviceAvailable,
    /// An assignment code was rejected.
    InvalidOrExpiredOtp {
        /// The precise rejection reason.
        reason: OtpRejection,
    },
    /// The device is not assigned, or is held by someone else.
    NotYoursOrNotAssigned,
    /// No unverified return code matches.
    InvalidOtp,
    /// The matching return code has expired.
    OtpExpired,
}

impl RuleViolation {
    /// Machine-readable code exposed to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientStock => "INSUFFICIENT_STOCK",
            Self::DailyLimitExceeded { .. } => "DAILY_LIMIT_EXCEEDED",
            Self::NothingToReturn => "NOTHING_TO_RETURN",
            Self::TabNotFound => "TAB_NOT_FOUND",
            Self::DeviceNotFound => "DEVICE_NOT_FOUND",
            Self::DeviceUnavailable => "DEVICE_UNAVAILABLE",
            Self::NoDeviceAvailable => "NO_DEVICE_AVAILABLE",
            Self::InvalidOrExpiredOtp { .. } => "INVALID_OR_EXPIRED_OTP",
            Self::NotYoursOrNotAssigned => "NOT_YOURS_OR_NOT_ASSIGNED",
            Self::InvalidOtp => "INVALID_OTP",
            Self::OtpExpired => "OTP_EXPIRED",
        }
    }

    /// The user-facing message for this violation.
    pub fn message(&self) -> String {
        match self {
            Self::InsufficientStock => "Insufficient stock.".to_string(),
            Self::DailyLimitExceeded { limit } => format!("Daily limit of {limit} reached."),
            Self::NothingToReturn => {
                "You cannot return this tab because you haven't logged any usage for it."
                    .to_string()
            }
            Self::TabNotFound => "Tab not found.".to_string(),
            Self::DeviceNotFound => "Device not found.".to_string(),
            Self::DeviceUnavailable => "Device is not available.".to_string(),
            Self::NoDeviceAvailable => "No device available for this tab type.".to_string(),
            Self::InvalidOrExpiredOtp { reason } => format!("Invalid or expired OTP: {reason}."),
            Self::NotYoursOrNotAssigned => {
                "This device is not assigned to you or is not checked out.".to_string()
            }
            Self::InvalidOtp => "Invalid OTP.".to_string(),
            Self::OtpExpired => "OTP has expired.".to_string(),
        }
    }

    /// Whether the violation means a referenced entity is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TabNotFound | Self::DeviceNotFound)
    }
}

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource was not found.
    NotFound,
    /// Authentication failed (missing, invalid or expired token).
    Authentication,
    /// The caller does not have permission to perform the action.
    Authorization,
    /// Input validation failed.
    Validation,
    /// A uniqueness conflict occurred (duplicate serial number etc.).
    Conflict,
    /// A ledger or state-machine rule refused the operation.
    Rule(RuleViolation),
    /// An internal server error occurred.
    Internal,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// The service is temporarily unavailable; the request may be retried.
    ServiceUnavailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Rule(rule) => write!(f, "{}", rule.code()),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::ServiceUnavailable => write!(f, "SERVICE_UNAVAILABLE"),
        }
    }
}

/// The unified application error used throughout TabAudit.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a business-rule error carrying the rule's own message.
    pub fn rule(violation: RuleViolation) -> Self {
        Self::new(ErrorKind::Rule(violation), violation.message())
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a service-unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// The business rule behind this error, if any.
    pub fn violation(&self) -> Option<RuleViolation> {
        match self.kind {
            ErrorKind::Rule(rule) => Some(rule),
            _ => None,
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<RuleViolation> for AppError {
    fn from(violation: RuleViolation) -> Self {
        Self::rule(violation)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_error_uses_rule_message() {
        let err = AppError::rule(RuleViolation::DailyLimitExceeded { limit: 2 });
        assert_eq!(err.message, "Daily limit of 2 reached.");
        assert_eq!(
            err.violation(),
            Some(RuleViolation::DailyLimitExceeded { limit: 2 })
        );
        assert_eq!(err.kind.to_string(), "DAILY_LIMIT_EXCEEDED");
    }

    #[test]
    fn test_rule_messages_are_distinct() {
        let rules = [
            RuleViolation::InsufficientStock,
            RuleViolation::DailyLimitExceeded { limit: 1 },
            RuleViolation::NothingToReturn,
            RuleViolation::TabNotFound,
            RuleViolation::DeviceNotFound,
            RuleViolation::DeviceUnavailable,
            RuleViolation::NoDeviceAvailable,
            RuleViolation::InvalidOrExpiredOtp {
                reason: OtpRejection::Expired,
            },
            RuleViolation::NotYoursOrNotAssigned,
            RuleViolation::InvalidOtp,
            RuleViolation::OtpExpired,
        ];
        let mut messages: Vec<String> = rules.iter().map(|r| r.message()).collect();
        messages.sort();
        messages.dedup();
        assert_eq!(messages.len(), rules.len());
    }

    #[test]
    fn test_otp_rejection_reason_reaches_message() {
        let message = |reason| RuleViolation::InvalidOrExpiredOtp { reason }.message();
        assert_eq!(message(OtpRejection::NotFound), "Invalid or expired OTP: not found.");
        assert_eq!(message(OtpRejection::Expired), "Invalid or expired OTP: expired.");
        assert_eq!(
            message(OtpRejection::AlreadyUsed),
            "Invalid or expired OTP: already used."
        );

        let err = AppError::rule(RuleViolation::InvalidOrExpiredOtp {
            reason: OtpRejection::AlreadyUsed,
        });
        assert_eq!(err.kind.to_string(), "INVALID_OR_EXPIRED_OTP");
        assert_eq!(err.message, "Invalid or expired OTP: already used.");
    }

    #[test]
    fn test_not_found_rules() {
        assert!(RuleViolation::TabNotFound.is_not_found());
        assert!(RuleViolation::DeviceNotFound.is_not_found());
        assert!(!RuleViolation::InsufficientStock.is_not_found());
    }

    #[test]
    fn test_non_rule_error_has_no_violation() {
        assert!(AppError::validation("bad").violation().is_none());
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::other("boom");
        let err = AppError::with_source(ErrorKind::Database, "query failed", io);
        let cloned = err.clone();
        assert!(cloned.source.is_none());
        assert_eq!(cloned.kind, ErrorKind::Database);
    }
}
