use crate::{
    entities::monitor,
    models::DeviceStatus,
    services::monitors::{CreateMonitorInput, MonitorFilters, UpdateMonitorInput},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_monitors).post(create_monitor))
        .route(
            "/:id",
            get(get_monitor).put(update_monitor).delete(delete_monitor),
        )
}

#[derive(Debug, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonitorListQuery {
    pub status: Option<DeviceStatus>,
    /// Exact brand match
    pub brand: Option<String>,
    /// Substring match on asset id, brand, model, or serial number
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/monitors",
    params(MonitorListQuery),
    responses(
        (status = 200, description = "Monitors listed", body = ApiResponse<Vec<monitor::Model>>)
    ),
    tag = "monitors"
)]
pub async fn list_monitors(
    State(state): State<AppState>,
    Query(query): Query<MonitorListQuery>,
) -> ApiResult<Vec<monitor::Model>> {
    let filters = MonitorFilters {
        status: query.status,
        brand: query.brand,
        search: query.search,
    };
    let monitors = state.monitor_service().list(filters).await?;
    Ok(Json(ApiResponse::success(monitors)))
}

#[utoipa::path(
    get,
    path = "/api/v1/monitors/:id",
    params(("id" = Uuid, Path, description = "Monitor ID")),
    responses(
        (status = 200, description = "Monitor fetched", body = ApiResponse<monitor::Model>),
        (status = 404, description = "Monitor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "monitors"
)]
pub async fn get_monitor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<monitor::Model> {
    let monitor = state.monitor_service().get(id).await?;
    Ok(Json(ApiResponse::success(monitor)))
}

#[utoipa::path(
    post,
    path = "/api/v1/monitors",
    request_body = CreateMonitorInput,
    responses(
        (status = 200, description = "Monitor created", body = ApiResponse<monitor::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "monitors"
)]
pub async fn create_monitor(
    State(state): State<AppState>,
    Json(payload): Json<CreateMonitorInput>,
) -> ApiResult<monitor::Model> {
    let monitor = state.monitor_service().create(payload).await?;
    Ok(Json(ApiResponse::success(monitor)))
}

#[utoipa::path(
    put,
    path = "/api/v1/monitors/:id",
    params(("id" = Uuid, Path, description = "Monitor ID")),
    request_body = UpdateMonitorInput,
    responses(
        (status = 200, description = "Monitor updated", body = ApiResponse<monitor::Model>),
        (status = 404, description = "Monitor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "monitors"
)]
pub async fn update_monitor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMonitorInput>,
) -> ApiResult<monitor::Model> {
    let monitor = state.monitor_service().update(id, payload).await?;
    Ok(Json(ApiResponse::success(monitor)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/monitors/:id",
    params(("id" = Uuid, Path, description = "Monitor ID")),
    responses(
        (status = 200, description = "Monitor deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Monitor not found", body = crate::errors::ErrorResponse)
    ),
    tag = "monitors"
)]
pub async fn delete_monitor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.monitor_service().delete(id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }))))
}
