use crate::{
    models::DeviceStatus,
    services::laptops::{CreateLaptopInput, LaptopFilters, LaptopView, UpdateLaptopInput},
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
        .route("/", get(list_laptops).post(create_laptop))
        .route(
            "/:id",
            get(get_laptop).put(update_laptop).delete(delete_laptop),
        )
}

#[derive(Debug, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LaptopListQuery {
    pub status: Option<DeviceStatus>,
    /// Exact brand match
    pub brand: Option<String>,
    /// Substring match on asset id, brand, model, or serial number
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/laptops",
    params(LaptopListQuery),
    responses(
        (status = 200, description = "Laptops listed", body = ApiResponse<Vec<LaptopView>>)
    ),
    tag = "laptops"
)]
pub async fn list_laptops(
    State(state): State<AppState>,
    Query(query): Query<LaptopListQuery>,
) -> ApiResult<Vec<LaptopView>> {
    let filters = LaptopFilters {
        status: query.status,
        brand: query.brand,
        search: query.search,
    };
    let laptops = state.laptop_service().list(filters).await?;
    Ok(Json(ApiResponse::success(laptops)))
}

#[utoipa::path(
    get,
    path = "/api/v1/laptops/:id",
    params(("id" = Uuid, Path, description = "Laptop ID")),
    responses(
        (status = 200, description = "Laptop fetched", body = ApiResponse<LaptopView>),
        (status = 404, description = "Laptop not found", body = crate::errors::ErrorResponse)
    ),
    tag = "laptops"
)]
pub async fn get_laptop(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<LaptopView> {
    let laptop = state.laptop_service().get(id).await?;
    Ok(Json(ApiResponse::success(laptop)))
}

#[utoipa::path(
    post,
    path = "/api/v1/laptops",
    request_body = CreateLaptopInput,
    responses(
        (status = 200, description = "Laptop created", body = ApiResponse<LaptopView>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "laptops"
)]
pub async fn create_laptop(
    State(state): State<AppState>,
    Json(payload): Json<CreateLaptopInput>,
) -> ApiResult<LaptopView> {
    let laptop = state.laptop_service().create(payload).await?;
    Ok(Json(ApiResponse::success(laptop)))
}

#[utoipa::path(
    put,
    path = "/api/v1/laptops/:id",
    params(("id" = Uuid, Path, description = "Laptop ID")),
    request_body = UpdateLaptopInput,
    responses(
        (status = 200, description = "Laptop updated", body = ApiResponse<LaptopView>),
        (status = 404, description = "Laptop not found", body = crate::errors::ErrorResponse)
    ),
    tag = "laptops"
)]
pub async fn update_laptop(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLaptopInput>,
) -> ApiResult<LaptopView> {
    let laptop = state.laptop_service().update(id, payload).await?;
    Ok(Json(ApiResponse::success(laptop)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/laptops/:id",
    params(("id" = Uuid, Path, description = "Laptop ID")),
    responses(
        (status = 200, description = "Laptop deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Laptop not found", body = crate::errors::ErrorResponse)
    ),
    tag = "laptops"
)]
pub async fn delete_laptop(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.laptop_service().delete(id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }))))
}
