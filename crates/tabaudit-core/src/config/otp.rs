//! One-time code configuration.

use serde::{Deserialize, Serialize};

/// Lifetimes and generation bounds for assignment and return codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    /// Validity of an admin-issued assignment code, in hours.
    #[serde(default = "default_assignment_ttl")]
    pub assignment_ttl_hours: i64,
    /// Validity of a return verification code, in minutes.
    #[serde(default = "default_return_ttl")]
    pub return_ttl_minutes: i64,
    /// Number of decimal digits per code.
    #[serde(default = "default_code_length")]
    pub code_length: u32,
    /// Attempts before giving up on finding an unused code.
    #[serde(default = "default_max_attempts")]
    pub max_generation_attempts: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            assignment_ttl_hours: default_assignment_ttl(),
            return_ttl_minutes: default_return_ttl(),
            code_length: default_code_length(),
            max_generation_attempts: default_max_attempts(),
        }
    }
}

fn default_assignment_ttl() -> i64 {
    12
}

fn default_return_ttl() -> i64 {
    10
}

fn default_code_length() -> u32 {
    6
}

fn default_max_attempts() -> u32 {
    10
}
