pub mod account;
pub mod booking;
pub mod department;
pub mod desktop;
pub mod desktop_memory;
pub mod desktop_storage;
pub mod employee;
pub mod employee_device;
pub mod employee_monitor;
pub mod laptop;
pub mod monitor;
pub mod position;
pub mod role;
pub mod service_request;
