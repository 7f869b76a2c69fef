//! Device assignment state machine.

pub mod service;

pub use service::{AssignTarget, AssignmentReceipt, AssignmentService, ReturnReceipt};
