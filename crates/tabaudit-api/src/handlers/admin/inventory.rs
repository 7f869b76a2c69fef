//! Stock, limit and assignment code handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use tabaudit_entity::tab::TabType;
use tabaudit_service::inventory::{IssuedOtp, StockUpdate};

use crate::dto::request::{AddTabRequest, GenerateOtpRequest, SetLimitRequest};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// POST /api/admin/add-tab
pub async fn add_tab(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<AddTabRequest>,
) -> ApiResult<Json<StockUpdate>> {
    require_admin(&auth)?;
    let update = state
        .inventory_service
        .add_tab(&auth, &req.name, req.quantity, req.limit)
        .await?;
    Ok(Json(update))
}

/// PUT /api/admin/tabs/{id}/limit
pub async fn set_limit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidJson(req): ValidJson<SetLimitRequest>,
) -> ApiResult<Json<TabType>> {
    require_admin(&auth)?;
    let tab = state
        .inventory_service
        .set_limit(&auth, id, req.daily_limit)
        .await?;
    Ok(Json(tab))
}

/// POST /api/admin/generate-otp
pub async fn generate_otp(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<GenerateOtpRequest>,
) -> ApiResult<(StatusCode, Json<IssuedOtp>)> {
    require_admin(&auth)?;
    let otp = state
        .inventory_service
        .generate_assignment_otp(&auth, req.tab_type_id)
        .await?;
    Ok((StatusCode::CREATED, Json(otp)))
}
