//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use tabaudit_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
}

/// HTTP status for an error kind.
pub fn status_for(kind: &ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Rule(rule) if rule.is_not_found() => StatusCode::NOT_FOUND,
        ErrorKind::Rule(_) | ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::Authorization => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Configuration
        | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<&AppError> for ApiErrorResponse {
    fn from(err: &AppError) -> Self {
        let error = if status_for(&err.kind).is_server_error()
            && err.kind != ErrorKind::ServiceUnavailable
        {
            "Internal server error".to_string()
        } else {
            err.message.clone()
        };
        Self {
            error,
            code: err.kind.to_string(),
        }
    }
}

/// Newtype so the foreign `AppError` can be returned from handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0.kind);
        if status.is_server_error() {
            tracing::error!(
                code = %self.0.kind,
                error = %self.0.message,
                source = ?self.0.source,
                "Request failed"
            );
        }

        (status, Json(ApiErrorResponse::from(&self.0))).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
