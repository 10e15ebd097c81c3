use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::DeviceKind;

/// Domain events published after a mutation commits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    DeviceDeployed {
        employee_device_id: Uuid,
        employee_id: Uuid,
        device_type: DeviceKind,
        device_id: Uuid,
        monitor_count: usize,
    },
    DeviceReturned {
        employee_device_id: Uuid,
        device_type: DeviceKind,
        device_id: Uuid,
    },
    LaptopCreated(Uuid),
    LaptopDeleted(Uuid),
    DesktopCreated(Uuid),
    DesktopDeleted(Uuid),
    MonitorCreated(Uuid),
    MonitorDeleted(Uuid),
    EmployeeCreated(Uuid),
    EmployeeDeleted(Uuid),
    RequestStatusChanged {
        request_id: Uuid,
        new_status: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Consumes the event channel and logs everything that happened. Mutations
/// must not depend on this task; a lagging consumer only delays log lines.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::DeviceDeployed {
                employee_device_id,
                employee_id,
                device_type,
                monitor_count,
                ..
            } => {
                info!(
                    assignment = %employee_device_id,
                    employee = %employee_id,
                    device_type = %device_type,
                    monitors = monitor_count,
                    "device deployed"
                );
            }
            Event::DeviceReturned {
                employee_device_id,
                device_type,
                ..
            } => {
                info!(
                    assignment = %employee_device_id,
                    device_type = %device_type,
                    "device returned"
                );
            }
            other => debug!(event = ?other, "domain event"),
        }
    }
    warn!("event channel closed; event processor exiting");
}
