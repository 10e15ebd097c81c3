use crate::{
    commands::deployments::{DeployDeviceCommand, DeployDeviceResult, ReturnDeviceResult},
    models::{AssignmentStatus, DeviceKind, DeviceRef},
    services::deployments::{DevicePick, DeviceSpecs, DeploymentView, HistoryFilters, ReturnedStats},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(deploy_device))
        .route("/current", get(current_deployments))
        .route("/history", get(deployment_history))
        .route("/returned", get(returned_devices))
        .route("/returned/stats", get(returned_stats))
        .route("/available-devices", get(available_devices))
        .route("/available-monitors", get(available_monitors))
        .route("/specs/:device_type/:device_id", get(device_specs))
        .route("/:id/return", post(return_device))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeployDeviceRequest {
    pub employee_id: Uuid,
    pub device_type: DeviceKind,
    pub device_id: Uuid,
    #[serde(default)]
    pub monitor_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    pub device_type: Option<DeviceKind>,
    pub status: Option<AssignmentStatus>,
    /// Substring match on employee code or name
    pub search: Option<String>,
    /// Only assignments issued within the last N days
    pub days: Option<i64>,
}

#[utoipa::path(
    post,
    path = "/api/v1/deployments",
    request_body = DeployDeviceRequest,
    responses(
        (status = 200, description = "Device deployed", body = ApiResponse<DeployDeviceResult>),
        (status = 400, description = "Precondition failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Employee or device not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Device already deployed", body = crate::errors::ErrorResponse)
    ),
    tag = "deployments"
)]
pub async fn deploy_device(
    State(state): State<AppState>,
    Json(payload): Json<DeployDeviceRequest>,
) -> ApiResult<DeployDeviceResult> {
    let command = DeployDeviceCommand {
        employee_id: payload.employee_id,
        device_type: payload.device_type,
        device_id: payload.device_id,
        monitor_ids: payload.monitor_ids,
    };
    let result = state.deployment_service().deploy_device(command).await?;
    Ok(Json(ApiResponse::success(result)))
}

#[utoipa::path(
    post,
    path = "/api/v1/deployments/:id/return",
    params(("id" = Uuid, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Device returned", body = ApiResponse<ReturnDeviceResult>),
        (status = 400, description = "Assignment already returned", body = crate::errors::ErrorResponse),
        (status = 404, description = "Assignment not found", body = crate::errors::ErrorResponse)
    ),
    tag = "deployments"
)]
pub async fn return_device(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ReturnDeviceResult> {
    let result = state.deployment_service().return_device(id).await?;
    Ok(Json(ApiResponse::success(result)))
}

#[utoipa::path(
    get,
    path = "/api/v1/deployments/current",
    responses(
        (status = 200, description = "Active deployments", body = ApiResponse<Vec<DeploymentView>>)
    ),
    tag = "deployments"
)]
pub async fn current_deployments(
    State(state): State<AppState>,
) -> ApiResult<Vec<DeploymentView>> {
    let views = state.deployment_service().current_deployments().await?;
    Ok(Json(ApiResponse::success(views)))
}

#[utoipa::path(
    get,
    path = "/api/v1/deployments/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Assignment history", body = ApiResponse<Vec<DeploymentView>>)
    ),
    tag = "deployments"
)]
pub async fn deployment_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Vec<DeploymentView>> {
    let filters = HistoryFilters {
        device_type: query.device_type,
        status: query.status,
        search: query.search,
        days: query.days,
    };
    let views = state.deployment_service().deployment_history(filters).await?;
    Ok(Json(ApiResponse::success(views)))
}

#[utoipa::path(
    get,
    path = "/api/v1/deployments/returned",
    responses(
        (status = 200, description = "Returned devices", body = ApiResponse<Vec<DeploymentView>>)
    ),
    tag = "deployments"
)]
pub async fn returned_devices(State(state): State<AppState>) -> ApiResult<Vec<DeploymentView>> {
    let views = state.deployment_service().returned_devices().await?;
    Ok(Json(ApiResponse::success(views)))
}

#[utoipa::path(
    get,
    path = "/api/v1/deployments/returned/stats",
    responses(
        (status = 200, description = "Returned device statistics", body = ApiResponse<ReturnedStats>)
    ),
    tag = "deployments"
)]
pub async fn returned_stats(State(state): State<AppState>) -> ApiResult<ReturnedStats> {
    let stats = state.deployment_service().returned_stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailableDevicesQuery {
    pub device_type: DeviceKind,
}

#[utoipa::path(
    get,
    path = "/api/v1/deployments/available-devices",
    params(AvailableDevicesQuery),
    responses(
        (status = 200, description = "Devices free to deploy", body = ApiResponse<Vec<DevicePick>>)
    ),
    tag = "deployments"
)]
pub async fn available_devices(
    State(state): State<AppState>,
    Query(query): Query<AvailableDevicesQuery>,
) -> ApiResult<Vec<DevicePick>> {
    let picks = state
        .deployment_service()
        .available_devices(query.device_type)
        .await?;
    Ok(Json(ApiResponse::success(picks)))
}

#[utoipa::path(
    get,
    path = "/api/v1/deployments/available-monitors",
    responses(
        (status = 200, description = "Monitors free to deploy", body = ApiResponse<Vec<DevicePick>>)
    ),
    tag = "deployments"
)]
pub async fn available_monitors(State(state): State<AppState>) -> ApiResult<Vec<DevicePick>> {
    let picks = state.deployment_service().available_monitors().await?;
    Ok(Json(ApiResponse::success(picks)))
}

#[utoipa::path(
    get,
    path = "/api/v1/deployments/specs/:device_type/:device_id",
    params(
        ("device_type" = DeviceKind, Path, description = "LAPTOP or DESKTOP"),
        ("device_id" = Uuid, Path, description = "Device ID")
    ),
    responses(
        (status = 200, description = "Device hardware detail", body = ApiResponse<DeviceSpecs>),
        (status = 404, description = "Device not found", body = crate::errors::ErrorResponse)
    ),
    tag = "deployments"
)]
pub async fn device_specs(
    State(state): State<AppState>,
    Path((device_type, device_id)): Path<(DeviceKind, Uuid)>,
) -> ApiResult<DeviceSpecs> {
    let specs = state
        .deployment_service()
        .device_specs(DeviceRef::new(device_type, device_id))
        .await?;
    Ok(Json(ApiResponse::success(specs)))
}
