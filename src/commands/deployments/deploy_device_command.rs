use crate::{
    commands::Command,
    db::DbPool,
    entities::{desktop, employee, employee_device, employee_monitor, laptop, monitor},
    errors::ServiceError,
    events::{Event, EventSender},
    models::{AssignmentStatus, DeviceKind, DeviceStatus, EmployeeStatus},
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
use validator::Validate;

/// Issues a device (and optionally monitors) to an employee.
///
/// All writes happen in one transaction: the assignment row, the device
/// status flip, and the monitor links either all commit or none do.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeployDeviceCommand {
    pub employee_id: Uuid,
    pub device_type: DeviceKind,
    pub device_id: Uuid,
    #[validate(length(max = 8, message = "At most 8 monitors per deployment"))]
    #[serde(default)]
    pub monitor_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeployDeviceResult {
    pub employee_device_id: Uuid,
    pub employee_id: Uuid,
    pub device_type: DeviceKind,
    pub device_id: Uuid,
    pub status: String,
    pub date_issued: NaiveDate,
    pub monitor_ids: Vec<Uuid>,
}

#[async_trait::async_trait]
impl Command for DeployDeviceCommand {
    type Result = DeployDeviceResult;

    #[instrument(skip(self, db_pool, event_sender), fields(employee_id = %self.employee_id, device_id = %self.device_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            let msg = format!("Invalid input: {}", e);
            error!("{}", msg);
            ServiceError::ValidationError(msg)
        })?;

        let mut deduped = self.monitor_ids.clone();
        deduped.sort();
        deduped.dedup();
        if deduped.len() != self.monitor_ids.len() {
            return Err(ServiceError::ValidationError(
                "Duplicate monitor ids in deployment".into(),
            ));
        }

        let command = self.clone();
        let saved = db_pool
            .transaction::<_, employee_device::Model, ServiceError>(|txn| {
                Box::pin(async move { command.deploy(txn).await })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        self.log_and_trigger_event(&event_sender, &saved).await?;

        Ok(DeployDeviceResult {
            employee_device_id: saved.employee_device_id,
            employee_id: saved.employee_id,
            device_type: self.device_type,
            device_id: saved.device_id,
            status: saved.status,
            date_issued: saved.date_issued,
            monitor_ids: self.monitor_ids.clone(),
        })
    }
}

impl DeployDeviceCommand {
    async fn deploy(
        &self,
        txn: &DatabaseTransaction,
    ) -> Result<employee_device::Model, ServiceError> {
        self.check_employee(txn).await?;
        self.check_device_available(txn).await?;
        self.check_no_active_assignment(txn).await?;

        let today = Utc::now().date_naive();

        let assignment = employee_device::ActiveModel {
            employee_device_id: Set(Uuid::new_v4()),
            employee_id: Set(self.employee_id),
            device_type: Set(self.device_type.to_string()),
            device_id: Set(self.device_id),
            status: Set(AssignmentStatus::InUse.as_str().to_owned()),
            date_issued: Set(today),
            date_returned: Set(None),
            ..Default::default()
        };
        let saved = assignment.insert(txn).await?;

        self.mark_device_issued(txn).await?;
        self.attach_monitors(txn, saved.employee_device_id).await?;

        Ok(saved)
    }

    async fn check_employee(&self, txn: &DatabaseTransaction) -> Result<(), ServiceError> {
        let emp = employee::Entity::find_by_id(self.employee_id)
            .one(txn)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Employee {} not found", self.employee_id))
            })?;
        if emp.status != EmployeeStatus::Active.as_str() {
            return Err(ServiceError::InvalidOperation(format!(
                "Employee {} is not active",
                emp.employee_code
            )));
        }
        Ok(())
    }

    async fn check_device_available(&self, txn: &DatabaseTransaction) -> Result<(), ServiceError> {
        let status = match self.device_type {
            DeviceKind::Laptop => laptop::Entity::find_by_id(self.device_id)
                .one(txn)
                .await?
                .map(|m| m.status),
            DeviceKind::Desktop => desktop::Entity::find_by_id(self.device_id)
                .one(txn)
                .await?
                .map(|m| m.status),
        };
        let status = status.ok_or_else(|| {
            ServiceError::NotFound(format!(
                "{} {} not found",
                self.device_type, self.device_id
            ))
        })?;
        if status != DeviceStatus::Available.as_str() {
            return Err(ServiceError::InvalidOperation(format!(
                "Device is not available (status: {})",
                status
            )));
        }
        Ok(())
    }

    /// The partial unique index enforces this at commit time; checking here
    /// turns the common case into a 409 instead of a database error.
    async fn check_no_active_assignment(
        &self,
        txn: &DatabaseTransaction,
    ) -> Result<(), ServiceError> {
        let existing = employee_device::Entity::find()
            .filter(employee_device::Column::DeviceType.eq(self.device_type.to_string()))
            .filter(employee_device::Column::DeviceId.eq(self.device_id))
            .filter(employee_device::Column::Status.eq(AssignmentStatus::InUse.as_str()))
            .one(txn)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Device {} is already deployed",
                self.device_id
            )));
        }
        Ok(())
    }

    async fn mark_device_issued(&self, txn: &DatabaseTransaction) -> Result<(), ServiceError> {
        match self.device_type {
            DeviceKind::Laptop => {
                let model = laptop::Entity::find_by_id(self.device_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Laptop {} not found", self.device_id))
                    })?;
                let mut active: laptop::ActiveModel = model.into();
                active.status = Set(DeviceStatus::Issued.as_str().to_owned());
                active.update(txn).await?;
            }
            DeviceKind::Desktop => {
                let model = desktop::Entity::find_by_id(self.device_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Desktop {} not found", self.device_id))
                    })?;
                let mut active: desktop::ActiveModel = model.into();
                active.status = Set(DeviceStatus::Issued.as_str().to_owned());
                active.update(txn).await?;
            }
        }
        Ok(())
    }

    async fn attach_monitors(
        &self,
        txn: &DatabaseTransaction,
        employee_device_id: Uuid,
    ) -> Result<(), ServiceError> {
        for monitor_id in &self.monitor_ids {
            let model = monitor::Entity::find_by_id(*monitor_id)
                .one(txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Monitor {} not found", monitor_id))
                })?;
            if model.status != DeviceStatus::Available.as_str() {
                return Err(ServiceError::InvalidOperation(format!(
                    "Monitor {} is not available (status: {})",
                    model.asset_id, model.status
                )));
            }

            let link = employee_monitor::ActiveModel {
                employee_monitor_id: Set(Uuid::new_v4()),
                employee_device_id: Set(employee_device_id),
                monitor_id: Set(*monitor_id),
                ..Default::default()
            };
            link.insert(txn).await?;

            let mut active: monitor::ActiveModel = model.into();
            active.status = Set(DeviceStatus::Issued.as_str().to_owned());
            active.update(txn).await?;
        }
        Ok(())
    }

    async fn log_and_trigger_event(
        &self,
        event_sender: &EventSender,
        saved: &employee_device::Model,
    ) -> Result<(), ServiceError> {
        info!(
            "Deployed {} {} to employee {} with {} monitor(s)",
            self.device_type,
            self.device_id,
            self.employee_id,
            self.monitor_ids.len()
        );
        event_sender
            .send(Event::DeviceDeployed {
                employee_device_id: saved.employee_device_id,
                employee_id: saved.employee_id,
                device_type: self.device_type,
                device_id: saved.device_id,
                monitor_count: self.monitor_ids.len(),
            })
            .await
            .map_err(|e| {
                let msg = format!("Failed to send event for deployment: {}", e);
                error!("{}", msg);
                ServiceError::EventError(msg)
            })
    }
}
