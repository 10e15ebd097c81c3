//! Asset API Library
//!
//! IT-asset inventory and deployment tracking: catalog CRUD for laptops,
//! desktops, and monitors, an employee/department/position directory, the
//! device deploy/return lifecycle, and a service-request workflow.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod commands;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn deployment_service(&self) -> Arc<services::DeploymentService> {
        self.services.deployments.clone()
    }

    pub fn laptop_service(&self) -> Arc<services::LaptopService> {
        self.services.laptops.clone()
    }

    pub fn desktop_service(&self) -> Arc<services::DesktopService> {
        self.services.desktops.clone()
    }

    pub fn monitor_service(&self) -> Arc<services::MonitorService> {
        self.services.monitors.clone()
    }

    pub fn directory_service(&self) -> Arc<services::DirectoryService> {
        self.services.directory.clone()
    }

    pub fn request_service(&self) -> Arc<services::ServiceRequestService> {
        self.services.requests.clone()
    }

    pub fn auth_service(&self) -> Arc<auth::AuthService> {
        self.services.auth.clone()
    }
}

/// Wires every service against one database handle and event channel.
pub fn build_services(
    db: Arc<DatabaseConnection>,
    event_sender: Arc<events::EventSender>,
    config: &config::AppConfig,
) -> handlers::AppServices {
    handlers::AppServices {
        deployments: Arc::new(services::DeploymentService::new(
            db.clone(),
            event_sender.clone(),
        )),
        laptops: Arc::new(services::LaptopService::new(
            db.clone(),
            event_sender.clone(),
        )),
        desktops: Arc::new(services::DesktopService::new(
            db.clone(),
            event_sender.clone(),
        )),
        monitors: Arc::new(services::MonitorService::new(
            db.clone(),
            event_sender.clone(),
        )),
        directory: Arc::new(services::DirectoryService::new(
            db.clone(),
            event_sender.clone(),
        )),
        requests: Arc::new(services::ServiceRequestService::new(
            db.clone(),
            event_sender,
        )),
        auth: Arc::new(auth::AuthService::new(
            auth::AuthConfig {
                jwt_secret: config.jwt_secret.clone(),
                jwt_expiration: config.jwt_expiration,
            },
            db,
        )),
    }
}

// Common response wrappers
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
        }
    }

    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some("Validation failed".to_string()),
            errors: Some(errors),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// All `/api/v1` routes. Everything except sign-in and the status probes sits
/// behind the console role gate.
pub fn api_v1_routes(auth_service: Arc<auth::AuthService>) -> Router<AppState> {
    let console = Router::new()
        .nest("/deployments", handlers::deployments::routes())
        .nest("/laptops", handlers::laptops::routes())
        .nest("/desktops", handlers::desktops::routes())
        .nest("/monitors", handlers::monitors::routes())
        .nest("/employees", handlers::employees::routes())
        .nest("/org", handlers::organization::routes())
        .nest("/requests", handlers::requests::routes())
        .layer(axum::middleware::from_fn_with_state(
            auth_service,
            auth::require_console_auth,
        ));

    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .nest("/auth", handlers::auth::routes())
        .merge(console)
}

/// Builds the full application router: versioned API, OpenAPI docs, request
/// tracing, CORS, and a request timeout.
pub fn app_router(state: AppState) -> Router {
    let api = api_v1_routes(state.auth_service());

    let cors = match state.config.cors_allowed_origins.as_deref() {
        Some(origins) if !origins.trim().is_empty() => {
            let list: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(list))
                .allow_methods(Any)
                .allow_headers(Any)
        }
        _ => CorsLayer::permissive(),
    };

    Router::new()
        .nest("/api/v1", api)
        .merge(openapi::swagger_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(30)))
        .with_state(state)
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "service": "asset-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    Ok(Json(ApiResponse::success(health_data)))
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[test]
    fn success_response_wraps_data() {
        let response = ApiResponse::success("ok");
        assert!(response.success);
        assert_eq!(response.data, Some("ok"));
        assert!(response.message.is_none());
    }

    #[test]
    fn error_response_carries_message() {
        let response = ApiResponse::<()>::error("oops".into());
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("oops"));
    }
}
