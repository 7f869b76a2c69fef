//! # tabaudit-api
//!
//! HTTP API layer for TabAudit built on Axum.
//!
//! Provides the check-in, device and admin endpoints, middleware (request
//! logging, CORS, admin guard), extractors, DTOs, and the mapping from
//! [`tabaudit_core::AppError`] to JSON error responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
