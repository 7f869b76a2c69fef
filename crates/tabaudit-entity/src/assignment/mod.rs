//! Device assignment ledger entries.

pub mod model;

pub use model::{AssignmentLog, AssignmentLogView, AssignmentStatus};
