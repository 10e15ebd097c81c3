use crate::{
    entities::booking,
    models::{DeviceKind, RequestStatus},
    services::requests::{
        BookingView, CreateBookingInput, CreateRequestInput, RequestFilters, RequestView,
    },
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_requests).post(create_request))
        .route("/bookings/today", get(todays_bookings))
        .route("/:id", get(get_request).delete(delete_request))
        .route("/:id/status", put(update_request_status))
        .route("/:id/bookings", post(create_booking))
}

#[derive(Debug, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RequestListQuery {
    pub status: Option<RequestStatus>,
    pub employee_id: Option<Uuid>,
    pub device_type: Option<DeviceKind>,
    pub request_type: Option<String>,
    /// Substring match on employee code or name
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRequestStatusBody {
    pub status: RequestStatus,
}

#[utoipa::path(
    get,
    path = "/api/v1/requests",
    params(RequestListQuery),
    responses(
        (status = 200, description = "Requests listed", body = ApiResponse<Vec<RequestView>>)
    ),
    tag = "requests"
)]
pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<RequestListQuery>,
) -> ApiResult<Vec<RequestView>> {
    let filters = RequestFilters {
        status: query.status,
        employee_id: query.employee_id,
        device_type: query.device_type,
        request_type: query.request_type,
        search: query.search,
    };
    let requests = state.request_service().list(filters).await?;
    Ok(Json(ApiResponse::success(requests)))
}

#[utoipa::path(
    get,
    path = "/api/v1/requests/:id",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request fetched", body = ApiResponse<RequestView>),
        (status = 404, description = "Request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "requests"
)]
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<RequestView> {
    let request = state.request_service().get(id).await?;
    Ok(Json(ApiResponse::success(request)))
}

#[utoipa::path(
    post,
    path = "/api/v1/requests",
    request_body = CreateRequestInput,
    responses(
        (status = 200, description = "Request created", body = ApiResponse<RequestView>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Employee not found", body = crate::errors::ErrorResponse)
    ),
    tag = "requests"
)]
pub async fn create_request(
    State(state): State<AppState>,
    Json(payload): Json<CreateRequestInput>,
) -> ApiResult<RequestView> {
    let request = state.request_service().create(payload).await?;
    Ok(Json(ApiResponse::success(request)))
}

#[utoipa::path(
    put,
    path = "/api/v1/requests/:id/status",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = UpdateRequestStatusBody,
    responses(
        (status = 200, description = "Request status updated", body = ApiResponse<RequestView>),
        (status = 400, description = "Illegal transition", body = crate::errors::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "requests"
)]
pub async fn update_request_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRequestStatusBody>,
) -> ApiResult<RequestView> {
    let request = state
        .request_service()
        .update_status(id, payload.status)
        .await?;
    Ok(Json(ApiResponse::success(request)))
}

#[utoipa::path(
    post,
    path = "/api/v1/requests/:id/bookings",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = CreateBookingInput,
    responses(
        (status = 200, description = "Booking created", body = ApiResponse<booking::Model>),
        (status = 400, description = "Request not approved", body = crate::errors::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "requests"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateBookingInput>,
) -> ApiResult<booking::Model> {
    let booking = state.request_service().create_booking(id, payload).await?;
    Ok(Json(ApiResponse::success(booking)))
}

#[utoipa::path(
    get,
    path = "/api/v1/requests/bookings/today",
    responses(
        (status = 200, description = "Today's bookings", body = ApiResponse<Vec<BookingView>>)
    ),
    tag = "requests"
)]
pub async fn todays_bookings(State(state): State<AppState>) -> ApiResult<Vec<BookingView>> {
    let bookings = state.request_service().todays_bookings().await?;
    Ok(Json(ApiResponse::success(bookings)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/requests/:id",
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Request not found", body = crate::errors::ErrorResponse)
    ),
    tag = "requests"
)]
pub async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.request_service().delete(id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }))))
}
