//! Device provisioning and listing handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use tabaudit_entity::device::TabletDevice;
use tabaudit_service::inventory::ProvisionDevice;

use crate::dto::request::{DeviceListQuery, ProvisionDeviceRequest};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidJson};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin/devices
pub async fn list_devices(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DeviceListQuery>,
) -> ApiResult<Json<Vec<TabletDevice>>> {
    require_admin(&auth)?;
    let status = query.status()?;
    let devices = state
        .inventory_service
        .list_devices(&auth, query.tab_type_id, status)
        .await?;
    Ok(Json(devices))
}

/// POST /api/admin/devices
pub async fn provision_device(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<ProvisionDeviceRequest>,
) -> ApiResult<(StatusCode, Json<TabletDevice>)> {
    require_admin(&auth)?;
    let device = state
        .inventory_service
        .provision_device(
            &auth,
            ProvisionDevice {
                tab_type_id: req.tab_type_id,
                serial_number: req.serial_number,
                scan_code: req.scan_code,
                condition: req.condition,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(device)))
}
