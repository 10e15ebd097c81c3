use crate::{auth, commands::deployments, entities, errors, handlers, services};
use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::deployments::deploy_device,
        handlers::deployments::return_device,
        handlers::deployments::current_deployments,
        handlers::deployments::deployment_history,
        handlers::deployments::returned_devices,
        handlers::deployments::returned_stats,
        handlers::deployments::available_devices,
        handlers::deployments::available_monitors,
        handlers::deployments::device_specs,
        handlers::laptops::list_laptops,
        handlers::laptops::get_laptop,
        handlers::laptops::create_laptop,
        handlers::laptops::update_laptop,
        handlers::laptops::delete_laptop,
        handlers::desktops::list_desktops,
        handlers::desktops::get_desktop,
        handlers::desktops::create_desktop,
        handlers::desktops::update_desktop,
        handlers::desktops::delete_desktop,
        handlers::monitors::list_monitors,
        handlers::monitors::get_monitor,
        handlers::monitors::create_monitor,
        handlers::monitors::update_monitor,
        handlers::monitors::delete_monitor,
        handlers::employees::list_employees,
        handlers::employees::get_employee,
        handlers::employees::create_employee,
        handlers::employees::update_employee,
        handlers::employees::delete_employee,
        handlers::organization::list_departments,
        handlers::organization::create_department,
        handlers::organization::update_department,
        handlers::organization::delete_department,
        handlers::organization::list_positions,
        handlers::organization::create_position,
        handlers::organization::update_position,
        handlers::organization::delete_position,
        handlers::requests::list_requests,
        handlers::requests::get_request,
        handlers::requests::create_request,
        handlers::requests::update_request_status,
        handlers::requests::create_booking,
        handlers::requests::todays_bookings,
        handlers::requests::delete_request,
    ),
    components(schemas(
        errors::ErrorResponse,
        auth::LoginRequest,
        auth::LoginResponse,
        crate::models::DeviceKind,
        crate::models::DeviceStatus,
        crate::models::AssignmentStatus,
        crate::models::EmployeeStatus,
        crate::models::RequestStatus,
        handlers::deployments::DeployDeviceRequest,
        handlers::requests::UpdateRequestStatusBody,
        deployments::DeployDeviceResult,
        deployments::ReturnDeviceResult,
        services::deployments::DeploymentView,
        services::deployments::MonitorSummary,
        services::deployments::DevicePick,
        services::deployments::DeviceSpecs,
        services::deployments::ReturnedStats,
        services::laptops::CreateLaptopInput,
        services::laptops::UpdateLaptopInput,
        services::laptops::LaptopView,
        services::desktops::CreateDesktopInput,
        services::desktops::UpdateDesktopInput,
        services::desktops::MemoryModuleInput,
        services::desktops::StorageDeviceInput,
        services::desktops::DesktopView,
        services::monitors::CreateMonitorInput,
        services::monitors::UpdateMonitorInput,
        services::directory::CreateEmployeeInput,
        services::directory::UpdateEmployeeInput,
        services::directory::EmployeeView,
        services::directory::NamedLookupInput,
        services::directory::LookupView,
        services::requests::CreateRequestInput,
        services::requests::CreateBookingInput,
        services::requests::RequestView,
        services::requests::BookingView,
        entities::laptop::Model,
        entities::desktop::Model,
        entities::desktop_memory::Model,
        entities::desktop_storage::Model,
        entities::monitor::Model,
        entities::employee::Model,
        entities::employee_device::Model,
        entities::service_request::Model,
        entities::booking::Model,
    )),
    tags(
        (name = "auth", description = "Sign-in"),
        (name = "deployments", description = "Device deploy/return lifecycle and assignment ledger"),
        (name = "laptops", description = "Laptop catalog"),
        (name = "desktops", description = "Desktop catalog with memory/storage children"),
        (name = "monitors", description = "Monitor catalog"),
        (name = "employees", description = "Employee directory"),
        (name = "organization", description = "Departments and positions"),
        (name = "requests", description = "Service requests and bookings"),
    ),
    info(
        title = "Asset API",
        description = "IT-asset inventory and deployment tracking service",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;

/// Serves the interactive API docs at `/docs` backed by `/api-docs/openapi.json`.
pub fn swagger_router() -> Router<crate::AppState> {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
