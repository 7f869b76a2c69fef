//! Direction of a consumable ledger entry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a check-in takes units from the pool or hands them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerAction {
    /// Take units; recorded as a positive quantity.
    Log,
    /// Hand units back; recorded as a negative quantity.
    Return,
}

impl LedgerAction {
    /// The signed ledger delta for `quantity` units.
    pub fn signed(&self, quantity: i32) -> i32 {
        match self {
            Self::Log => quantity,
            Self::Return => -quantity,
        }
    }

    /// Classify a stored signed quantity.
    pub fn of_quantity(quantity: i32) -> Self {
        if quantity > 0 { Self::Log } else { Self::Return }
    }

    /// Past-tense label used in messages and history.
    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Log => "Logged",
            Self::Return => "Returned",
        }
    }

    /// Return the action as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Return => "return",
        }
    }
}

impl fmt::Display for LedgerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LedgerAction {
    type Err = tabaudit_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "return" => Ok(Self::Return),
            _ => Err(tabaudit_core::AppError::validation(format!(
                "Invalid action: '{s}'. Expected one of: log, return"
            ))),
        }
    }
}
