//! Consumable check-in handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use tabaudit_entity::tab::TabType;
use tabaudit_service::ledger::{RecordUsage, UsageReceipt};

use crate::dto::request::CheckInRequest;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// GET /api/check-in
pub async fn list_tabs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<TabType>>> {
    let tabs = state.ledger_service.list_tabs(&auth).await?;
    Ok(Json(tabs))
}

/// POST /api/check-in
pub async fn check_in(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CheckInRequest>,
) -> ApiResult<(StatusCode, Json<UsageReceipt>)> {
    let receipt = state
        .ledger_service
        .record_usage(
            &auth,
            RecordUsage {
                tab_type_id: req.tab_id,
                action: req.action,
                quantity: req.quantity,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
