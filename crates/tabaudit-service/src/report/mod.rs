//! Read-only admin reporting.

pub mod service;

pub use service::{Dashboard, ReportService, StockLevel, UsageStats};
