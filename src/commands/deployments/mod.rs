pub mod deploy_device_command;
pub mod return_device_command;

pub use deploy_device_command::{DeployDeviceCommand, DeployDeviceResult};
pub use return_device_command::{ReturnDeviceCommand, ReturnDeviceResult};
