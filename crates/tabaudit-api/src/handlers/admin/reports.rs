//! Dashboard, statistics and filtered log handlers.

use axum::Json;
use axum::extract::{Query, State};

use tabaudit_entity::usage::UsageLogView;
use tabaudit_service::report::{Dashboard, UsageStats};

use crate::dto::request::LogsQuery;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Dashboard>> {
    require_admin(&auth)?;
    Ok(Json(state.report_service.dashboard(&auth).await?))
}

/// GET /api/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UsageStats>> {
    require_admin(&auth)?;
    Ok(Json(state.report_service.stats(&auth).await?))
}

/// GET /api/admin/logs?search=
pub async fn logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LogsQuery>,
) -> ApiResult<Json<Vec<UsageLogView>>> {
    require_admin(&auth)?;
    let logs = state
        .report_service
        .logs(&auth, query.search.as_deref())
        .await?;
    Ok(Json(logs))
}
