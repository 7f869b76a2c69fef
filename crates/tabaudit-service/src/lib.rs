//! # tabaudit-service
//!
//! Business logic service layer for TabAudit. Each service orchestrates
//! repositories inside lock-bounded transactions to implement one part of
//! the lending workflow:
//!
//! - [`LedgerService`]: consumable check-in (log / return) with stock and
//!   daily-limit enforcement
//! - [`AssignmentService`]: the device state machine
//! - [`OtpIssuer`]: generation and single-use consumption of codes
//! - [`InventoryService`]: admin stock, limit, device and code operations
//! - [`AuditRecorder`]: post-commit audit trail appends
//! - [`ReportService`]: read-only dashboards and statistics
//! - [`UserService`]: principal resolution
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod assignment;
pub mod audit;
pub mod clock;
pub mod context;
pub mod inventory;
pub mod ledger;
pub mod otp;
pub mod report;
pub mod user;

pub use assignment::AssignmentService;
pub use audit::AuditRecorder;
pub use clock::DayWindow;
pub use context::RequestContext;
pub use inventory::InventoryService;
pub use ledger::LedgerService;
pub use otp::OtpIssuer;
pub use report::ReportService;
pub use user::UserService;
