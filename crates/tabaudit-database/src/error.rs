//! Mapping of `sqlx` failures into [`AppError`].

use tabaudit_core::error::{AppError, ErrorKind};

/// `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";
/// `serialization_failure`
const SERIALIZATION_FAILURE: &str = "40001";
/// `deadlock_detected`
const DEADLOCK_DETECTED: &str = "40P01";
/// `lock_not_available`, raised when `lock_timeout` expires.
const LOCK_NOT_AVAILABLE: &str = "55P03";

fn sqlstate(err: &sqlx::Error) -> Option<String> {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code.into_owned())
}

/// Whether the failure is transient lock contention worth retrying.
pub fn is_retryable(err: &sqlx::Error) -> bool {
    matches!(
        sqlstate(err).as_deref(),
        Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED | LOCK_NOT_AVAILABLE)
    )
}

/// Whether the failure is a unique constraint rejection.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    sqlstate(err).as_deref() == Some(UNIQUE_VIOLATION)
}

/// Convert a `sqlx` error into an [`AppError`].
///
/// Lock contention becomes `ServiceUnavailable`, unique violations become
/// `Conflict`; everything else is a `Database` error carrying `message`.
pub fn db_error(message: &str, err: sqlx::Error) -> AppError {
    if is_retryable(&err) {
        tracing::warn!(error = %err, "{message}: lock contention");
        return AppError::with_source(
            ErrorKind::ServiceUnavailable,
            "The inventory is busy, please retry",
            err,
        );
    }
    if is_unique_violation(&err) {
        return AppError::with_source(
            ErrorKind::Conflict,
            format!("{message}: duplicate value"),
            err,
        );
    }
    AppError::with_source(ErrorKind::Database, message, err)
}
