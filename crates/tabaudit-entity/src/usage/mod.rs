//! Consumable ledger entries.

pub mod action;
pub mod model;

pub use action::LedgerAction;
pub use model::{UsageLog, UsageLogView};
