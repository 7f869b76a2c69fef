//! Consumable ledger configuration.

use serde::{Deserialize, Serialize};

/// Settings for the check-in ledger and its read projections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Offset of the local day boundary from UTC midnight, in minutes.
    /// Daily limits count entries from the most recent boundary.
    #[serde(default)]
    pub day_start_offset_minutes: i32,
    /// Number of entries returned by the personal history view.
    #[serde(default = "default_history_limit")]
    pub history_limit: i64,
    /// Number of entries returned by the admin filtered log view.
    #[serde(default = "default_search_limit")]
    pub search_limit: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            day_start_offset_minutes: 0,
            history_limit: default_history_limit(),
            search_limit: default_search_limit(),
        }
    }
}

fn default_history_limit() -> i64 {
    20
}

fn default_search_limit() -> i64 {
    50
}
