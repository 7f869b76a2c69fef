//! Condition text reported when a device is handed back.

use serde::{Deserialize, Serialize};

/// Condition assumed when the verifier reports none.
pub const DEFAULT_CONDITION: &str = "Good";

/// Free-text condition captured at return verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnCondition(String);

impl ReturnCondition {
    /// Wrap a condition, trimming surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    /// Use the reported condition, or `"Good"` when none or blank.
    pub fn from_optional(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(text) if !text.is_empty() => Self(text.to_string()),
            _ => Self(DEFAULT_CONDITION.to_string()),
        }
    }

    /// Whether the device can go straight back into the pool.
    pub fn is_good(&self) -> bool {
        self.0.eq_ignore_ascii_case(DEFAULT_CONDITION)
    }

    /// The stored text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_good_is_case_insensitive_and_trimmed() {
        assert!(ReturnCondition::new("good").is_good());
        assert!(ReturnCondition::new("  GOOD ").is_good());
        assert!(!ReturnCondition::new("Good but scratched").is_good());
    }

    #[test]
    fn test_missing_condition_defaults_to_good() {
        assert!(ReturnCondition::from_optional(None).is_good());
        assert!(ReturnCondition::from_optional(Some("   ")).is_good());
        assert_eq!(
            ReturnCondition::from_optional(Some(" Damaged ")).as_str(),
            "Damaged"
        );
    }
}
