use crate::{
    models::DeviceStatus,
    services::desktops::{CreateDesktopInput, DesktopFilters, DesktopView, UpdateDesktopInput},
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
        .route("/", get(list_desktops).post(create_desktop))
        .route(
            "/:id",
            get(get_desktop).put(update_desktop).delete(delete_desktop),
        )
}

#[derive(Debug, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DesktopListQuery {
    pub status: Option<DeviceStatus>,
    /// Substring match on asset id or processor
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/desktops",
    params(DesktopListQuery),
    responses(
        (status = 200, description = "Desktops listed", body = ApiResponse<Vec<DesktopView>>)
    ),
    tag = "desktops"
)]
pub async fn list_desktops(
    State(state): State<AppState>,
    Query(query): Query<DesktopListQuery>,
) -> ApiResult<Vec<DesktopView>> {
    let filters = DesktopFilters {
        status: query.status,
        search: query.search,
    };
    let desktops = state.desktop_service().list(filters).await?;
    Ok(Json(ApiResponse::success(desktops)))
}

#[utoipa::path(
    get,
    path = "/api/v1/desktops/:id",
    params(("id" = Uuid, Path, description = "Desktop ID")),
    responses(
        (status = 200, description = "Desktop fetched", body = ApiResponse<DesktopView>),
        (status = 404, description = "Desktop not found", body = crate::errors::ErrorResponse)
    ),
    tag = "desktops"
)]
pub async fn get_desktop(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<DesktopView> {
    let desktop = state.desktop_service().get(id).await?;
    Ok(Json(ApiResponse::success(desktop)))
}

#[utoipa::path(
    post,
    path = "/api/v1/desktops",
    request_body = CreateDesktopInput,
    responses(
        (status = 200, description = "Desktop created", body = ApiResponse<DesktopView>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "desktops"
)]
pub async fn create_desktop(
    State(state): State<AppState>,
    Json(payload): Json<CreateDesktopInput>,
) -> ApiResult<DesktopView> {
    let desktop = state.desktop_service().create(payload).await?;
    Ok(Json(ApiResponse::success(desktop)))
}

#[utoipa::path(
    put,
    path = "/api/v1/desktops/:id",
    params(("id" = Uuid, Path, description = "Desktop ID")),
    request_body = UpdateDesktopInput,
    responses(
        (status = 200, description = "Desktop updated", body = ApiResponse<DesktopView>),
        (status = 404, description = "Desktop not found", body = crate::errors::ErrorResponse)
    ),
    tag = "desktops"
)]
pub async fn update_desktop(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDesktopInput>,
) -> ApiResult<DesktopView> {
    let desktop = state.desktop_service().update(id, payload).await?;
    Ok(Json(ApiResponse::success(desktop)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/desktops/:id",
    params(("id" = Uuid, Path, description = "Desktop ID")),
    responses(
        (status = 200, description = "Desktop deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Desktop not found", body = crate::errors::ErrorResponse)
    ),
    tag = "desktops"
)]
pub async fn delete_desktop(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.desktop_service().delete(id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }))))
}
