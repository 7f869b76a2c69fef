//! # tabaudit-database
//!
//! PostgreSQL connection management, lock-bounded transactions and
//! concrete repository implementations for all TabAudit entities.
//!
//! Repositories keep a pool for plain reads. Operations that must run
//! under the row locks of a ledger transaction take an explicit
//! `&mut PgConnection` so the caller decides the transaction boundary.

pub mod connection;
pub mod error;
pub mod migration;
pub mod repositories;

pub use connection::{DatabasePool, TransactionManager};
pub use error::{db_error, is_retryable};
