//! Audit log handlers.

use axum::Json;
use axum::extract::{Query, State};

use tabaudit_core::types::pagination::PageResponse;
use tabaudit_entity::audit::AuditLogEntry;

use crate::dto::request::AuditQuery;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PaginationParams};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/audit
pub async fn search_audit(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
    Query(filters): Query<AuditQuery>,
) -> ApiResult<Json<PageResponse<AuditLogEntry>>> {
    require_admin(&auth)?;

    let result = state
        .audit_recorder
        .search(&auth, &filters.into_filter()?, params.into_page_request())
        .await?;

    Ok(Json(result))
}
