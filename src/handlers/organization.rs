use crate::{
    services::directory::{LookupView, NamedLookupInput},
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
        .route("/departments", get(list_departments).post(create_department))
        .route(
            "/departments/:id",
            axum::routing::put(update_department).delete(delete_department),
        )
        .route("/positions", get(list_positions).post(create_position))
        .route(
            "/positions/:id",
            axum::routing::put(update_position).delete(delete_position),
        )
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct OrgListQuery {
    /// Substring match on the name
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/org/departments",
    params(OrgListQuery),
    responses(
        (status = 200, description = "Departments listed", body = ApiResponse<Vec<LookupView>>)
    ),
    tag = "organization"
)]
pub async fn list_departments(
    State(state): State<AppState>,
    Query(query): Query<OrgListQuery>,
) -> ApiResult<Vec<LookupView>> {
    let departments = state
        .directory_service()
        .list_departments(query.search)
        .await?;
    Ok(Json(ApiResponse::success(departments)))
}

#[utoipa::path(
    post,
    path = "/api/v1/org/departments",
    request_body = NamedLookupInput,
    responses(
        (status = 200, description = "Department created", body = ApiResponse<LookupView>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "organization"
)]
pub async fn create_department(
    State(state): State<AppState>,
    Json(payload): Json<NamedLookupInput>,
) -> ApiResult<LookupView> {
    let department = state.directory_service().create_department(payload).await?;
    Ok(Json(ApiResponse::success(department)))
}

#[utoipa::path(
    put,
    path = "/api/v1/org/departments/:id",
    params(("id" = Uuid, Path, description = "Department ID")),
    request_body = NamedLookupInput,
    responses(
        (status = 200, description = "Department renamed", body = ApiResponse<LookupView>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Department not found", body = crate::errors::ErrorResponse)
    ),
    tag = "organization"
)]
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NamedLookupInput>,
) -> ApiResult<LookupView> {
    let department = state
        .directory_service()
        .update_department(id, payload)
        .await?;
    Ok(Json(ApiResponse::success(department)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/org/departments/:id",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Department not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Department still has employees", body = crate::errors::ErrorResponse)
    ),
    tag = "organization"
)]
pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.directory_service().delete_department(id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }))))
}

#[utoipa::path(
    get,
    path = "/api/v1/org/positions",
    params(OrgListQuery),
    responses(
        (status = 200, description = "Positions listed", body = ApiResponse<Vec<LookupView>>)
    ),
    tag = "organization"
)]
pub async fn list_positions(
    State(state): State<AppState>,
    Query(query): Query<OrgListQuery>,
) -> ApiResult<Vec<LookupView>> {
    let positions = state.directory_service().list_positions(query.search).await?;
    Ok(Json(ApiResponse::success(positions)))
}

#[utoipa::path(
    post,
    path = "/api/v1/org/positions",
    request_body = NamedLookupInput,
    responses(
        (status = 200, description = "Position created", body = ApiResponse<LookupView>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "organization"
)]
pub async fn create_position(
    State(state): State<AppState>,
    Json(payload): Json<NamedLookupInput>,
) -> ApiResult<LookupView> {
    let position = state.directory_service().create_position(payload).await?;
    Ok(Json(ApiResponse::success(position)))
}

#[utoipa::path(
    put,
    path = "/api/v1/org/positions/:id",
    params(("id" = Uuid, Path, description = "Position ID")),
    request_body = NamedLookupInput,
    responses(
        (status = 200, description = "Position renamed", body = ApiResponse<LookupView>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Position not found", body = crate::errors::ErrorResponse)
    ),
    tag = "organization"
)]
pub async fn update_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NamedLookupInput>,
) -> ApiResult<LookupView> {
    let position = state
        .directory_service()
        .update_position(id, payload)
        .await?;
    Ok(Json(ApiResponse::success(position)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/org/positions/:id",
    params(("id" = Uuid, Path, description = "Position ID")),
    responses(
        (status = 200, description = "Position deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Position not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Position still has employees", body = crate::errors::ErrorResponse)
    ),
    tag = "organization"
)]
pub async fn delete_position(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.directory_service().delete_position(id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }))))
}
