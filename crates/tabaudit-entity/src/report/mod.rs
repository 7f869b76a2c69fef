//! Read-only projections for dashboards and personal views.

pub mod model;

pub use model::{ActiveLoan, DailyUsage, HeldDevice, PossessedTab, TabUsageBreakdown};
