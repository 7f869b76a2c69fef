//! Audit trail recording and search.

pub mod recorder;

pub use recorder::AuditRecorder;
