use crate::{
    auth::AuthService,
    services::{
        DeploymentService, DesktopService, DirectoryService, LaptopService, MonitorService,
        ServiceRequestService,
    },
};
use std::sync::Arc;

pub mod auth;
pub mod deployments;
pub mod desktops;
pub mod employees;
pub mod laptops;
pub mod monitors;
pub mod organization;
pub mod requests;

/// Container for all application services, shared through [`crate::AppState`].
#[derive(Clone)]
pub struct AppServices {
    pub deployments: Arc<DeploymentService>,
    pub laptops: Arc<LaptopService>,
    pub desktops: Arc<DesktopService>,
    pub monitors: Arc<MonitorService>,
    pub directory: Arc<DirectoryService>,
    pub requests: Arc<ServiceRequestService>,
    pub auth: Arc<AuthService>,
}
