use crate::{
    auth::{LoginRequest, LoginResponse},
    ApiResponse, ApiResult, AppState,
};
use axum::{extract::State, response::Json, routing::post, Router};

pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let response = state
        .auth_service()
        .login(&payload.email, &payload.password)
        .await?;
    Ok(Json(ApiResponse::success(response)))
}
