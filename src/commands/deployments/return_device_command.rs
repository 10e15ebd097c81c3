use crate::{
    commands::Command,
    db::DbPool,
    entities::{desktop, employee_device, employee_monitor, laptop, monitor},
    errors::ServiceError,
    events::{Event, EventSender},
    models::{AssignmentStatus, DeviceKind, DeviceRef, DeviceStatus},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, Set,
    TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// Closes a deployment episode: the assignment is marked returned and the
/// device and its linked monitors go back to the available pool. The monitor
/// link rows are kept as history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnDeviceCommand {
    pub employee_device_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReturnDeviceResult {
    pub employee_device_id: Uuid,
    pub device_type: DeviceKind,
    pub device_id: Uuid,
    pub status: String,
    pub date_returned: NaiveDate,
    pub monitors_released: usize,
}

#[async_trait::async_trait]
impl Command for ReturnDeviceCommand {
    type Result = ReturnDeviceResult;

    #[instrument(skip(self, db_pool, event_sender), fields(assignment = %self.employee_device_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let command = self.clone();
        let (saved, device, monitors_released) = db_pool
            .transaction::<_, (employee_device::Model, DeviceRef, usize), ServiceError>(|txn| {
                Box::pin(async move { command.return_device(txn).await })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        info!(
            "Returned {} {} from assignment {}",
            device.kind(),
            device.id(),
            saved.employee_device_id
        );
        event_sender
            .send(Event::DeviceReturned {
                employee_device_id: saved.employee_device_id,
                device_type: device.kind(),
                device_id: device.id(),
            })
            .await
            .map_err(|e| {
                let msg = format!("Failed to send event for return: {}", e);
                error!("{}", msg);
                ServiceError::EventError(msg)
            })?;

        let date_returned = saved.date_returned.ok_or_else(|| {
            ServiceError::InternalError("Returned assignment is missing its return date".into())
        })?;

        Ok(ReturnDeviceResult {
            employee_device_id: saved.employee_device_id,
            device_type: device.kind(),
            device_id: device.id(),
            status: saved.status,
            date_returned,
            monitors_released,
        })
    }
}

impl ReturnDeviceCommand {
    async fn return_device(
        &self,
        txn: &DatabaseTransaction,
    ) -> Result<(employee_device::Model, DeviceRef, usize), ServiceError> {
        let assignment = employee_device::Entity::find_by_id(self.employee_device_id)
            .one(txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Assignment {} not found",
                    self.employee_device_id
                ))
            })?;

        if assignment.status != AssignmentStatus::InUse.as_str() {
            return Err(ServiceError::InvalidOperation(format!(
                "Assignment {} is already returned",
                self.employee_device_id
            )));
        }

        let device = assignment.device_ref()?;
        let today = Utc::now().date_naive();

        let mut active: employee_device::ActiveModel = assignment.into();
        active.status = Set(AssignmentStatus::Returned.as_str().to_owned());
        active.date_returned = Set(Some(today));
        let saved = active.update(txn).await?;

        self.release_device(txn, device).await?;
        let monitors_released = self.release_monitors(txn, saved.employee_device_id).await?;

        Ok((saved, device, monitors_released))
    }

    async fn release_device(
        &self,
        txn: &DatabaseTransaction,
        device: DeviceRef,
    ) -> Result<(), ServiceError> {
        match device {
            DeviceRef::Laptop(id) => {
                let model = laptop::Entity::find_by_id(id).one(txn).await?.ok_or_else(|| {
                    ServiceError::NotFound(format!("Laptop {} not found", id))
                })?;
                let mut active: laptop::ActiveModel = model.into();
                active.status = Set(DeviceStatus::Available.as_str().to_owned());
                active.update(txn).await?;
            }
            DeviceRef::Desktop(id) => {
                let model = desktop::Entity::find_by_id(id).one(txn).await?.ok_or_else(|| {
                    ServiceError::NotFound(format!("Desktop {} not found", id))
                })?;
                let mut active: desktop::ActiveModel = model.into();
                active.status = Set(DeviceStatus::Available.as_str().to_owned());
                active.update(txn).await?;
            }
        }
        Ok(())
    }

    async fn release_monitors(
        &self,
        txn: &DatabaseTransaction,
        employee_device_id: Uuid,
    ) -> Result<usize, ServiceError> {
        let links = employee_monitor::Entity::find()
            .filter(employee_monitor::Column::EmployeeDeviceId.eq(employee_device_id))
            .all(txn)
            .await?;

        let mut released = 0;
        for link in &links {
            if let Some(model) = monitor::Entity::find_by_id(link.monitor_id).one(txn).await? {
                let mut active: monitor::ActiveModel = model.into();
                active.status = Set(DeviceStatus::Available.as_str().to_owned());
                active.update(txn).await?;
                released += 1;
            }
        }
        Ok(released)
    }
}
