//! Self-service views of the caller's holdings and activity.

use axum::Json;
use axum::extract::State;

use tabaudit_service::ledger::{HistoryEntry, Possession};

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/possession
pub async fn possession(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Possession>> {
    Ok(Json(state.ledger_service.possession(&auth).await?))
}

/// GET /api/user/history
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    Ok(Json(state.ledger_service.history(&auth).await?))
}
