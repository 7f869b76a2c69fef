//! Convenience result type alias for TabAudit.

use crate::error::AppError;

/// A specialized `Result` type for TabAudit operations.
pub type AppResult<T> = Result<T, AppError>;
