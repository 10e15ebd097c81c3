pub mod deployments;
pub mod desktops;
pub mod directory;
pub mod laptops;
pub mod monitors;
pub mod requests;

pub use deployments::DeploymentService;
pub use desktops::DesktopService;
pub use directory::DirectoryService;
pub use laptops::LaptopService;
pub use monitors::MonitorService;
pub use requests::ServiceRequestService;
