//! # tabaudit-entity
//!
//! Domain entity models for TabAudit. Every struct in this crate
//! represents a database table row, a read projection, or a domain value
//! object. Database entities derive `sqlx::FromRow`; enums stored in
//! PostgreSQL derive `sqlx::Type`.
//!
//! Lifecycle rules that need no I/O (device status transitions, one-time
//! code validity, ledger action signs) live next to the types they govern
//! so they can be unit tested without a database.

pub mod assignment;
pub mod audit;
pub mod device;
pub mod otp;
pub mod report;
pub mod tab;
pub mod usage;
pub mod user;
