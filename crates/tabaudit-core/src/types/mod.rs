//! Core type definitions used across the TabAudit workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
