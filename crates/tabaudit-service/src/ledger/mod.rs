//! Consumable inventory ledger.

pub mod rules;
pub mod service;

pub use service::{HistoryEntry, LedgerService, Possession, RecordUsage, UsageReceipt};
