//! Device assignment and return handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use tabaudit_service::assignment::{AssignmentReceipt, ReturnReceipt};

use crate::dto::request::{AssignRequest, InitiateReturnRequest, VerifyReturnRequest};
use crate::dto::response::SuccessResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// POST /api/assign
pub async fn assign(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<AssignRequest>,
) -> ApiResult<(StatusCode, Json<AssignmentReceipt>)> {
    let receipt = state
        .assignment_service
        .assign(&auth, req.into_target()?)
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// POST /api/return/initiate
pub async fn initiate_return(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<InitiateReturnRequest>,
) -> ApiResult<Json<ReturnReceipt>> {
    let receipt = state
        .assignment_service
        .initiate_return(&auth, &req.device_id)
        .await?;
    Ok(Json(receipt))
}

/// POST /api/return/verify
pub async fn verify_return(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<VerifyReturnRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    let success = state
        .assignment_service
        .verify_return(
            &auth,
            &req.device_id,
            &req.otp_code,
            req.condition.as_deref(),
        )
        .await?;
    Ok(Json(SuccessResponse { success }))
}
