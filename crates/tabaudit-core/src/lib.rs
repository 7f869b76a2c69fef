//! # tabaudit-core
//!
//! Core crate for TabAudit. Contains configuration schemas, the unified
//! error system with its business-rule taxonomy, and pagination types.
//!
//! This crate has **no** internal dependencies on other TabAudit crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind, RuleViolation};
pub use result::AppResult;
