use crate::{
    models::EmployeeStatus,
    services::directory::{
        CreateEmployeeInput, EmployeeFilters, EmployeeView, UpdateEmployeeInput,
    },
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
        .route("/", get(list_employees).post(create_employee))
        .route(
            "/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

#[derive(Debug, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmployeeListQuery {
    pub status: Option<EmployeeStatus>,
    pub department_id: Option<Uuid>,
    pub position_id: Option<Uuid>,
    /// Substring match on code or name
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(EmployeeListQuery),
    responses(
        (status = 200, description = "Employees listed", body = ApiResponse<Vec<EmployeeView>>)
    ),
    tag = "employees"
)]
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<EmployeeListQuery>,
) -> ApiResult<Vec<EmployeeView>> {
    let filters = EmployeeFilters {
        status: query.status,
        department_id: query.department_id,
        position_id: query.position_id,
        search: query.search,
    };
    let employees = state.directory_service().list_employees(filters).await?;
    Ok(Json(ApiResponse::success(employees)))
}

#[utoipa::path(
    get,
    path = "/api/v1/employees/:id",
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee fetched", body = ApiResponse<EmployeeView>),
        (status = 404, description = "Employee not found", body = crate::errors::ErrorResponse)
    ),
    tag = "employees"
)]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<EmployeeView> {
    let employee = state.directory_service().get_employee(id).await?;
    Ok(Json(ApiResponse::success(employee)))
}

#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployeeInput,
    responses(
        (status = 200, description = "Employee created", body = ApiResponse<EmployeeView>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "employees"
)]
pub async fn create_employee(
    State(state): State<AppState>,
    Json(payload): Json<CreateEmployeeInput>,
) -> ApiResult<EmployeeView> {
    let employee = state.directory_service().create_employee(payload).await?;
    Ok(Json(ApiResponse::success(employee)))
}

#[utoipa::path(
    put,
    path = "/api/v1/employees/:id",
    params(("id" = Uuid, Path, description = "Employee ID")),
    request_body = UpdateEmployeeInput,
    responses(
        (status = 200, description = "Employee updated", body = ApiResponse<EmployeeView>),
        (status = 404, description = "Employee not found", body = crate::errors::ErrorResponse)
    ),
    tag = "employees"
)]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmployeeInput>,
) -> ApiResult<EmployeeView> {
    let employee = state
        .directory_service()
        .update_employee(id, payload)
        .await?;
    Ok(Json(ApiResponse::success(employee)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/employees/:id",
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Employee not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Employee still holds a device", body = crate::errors::ErrorResponse)
    ),
    tag = "employees"
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    state.directory_service().delete_employee(id).await?;
    Ok(Json(ApiResponse::success(json!({ "deleted": id }))))
}
