use crate::{
    db::DbPool,
    entities::monitor::{self, Entity as Monitor},
    errors::ServiceError,
    events::{Event, EventSender},
    models::DeviceStatus,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMonitorInput {
    #[validate(length(min = 1, message = "Asset id cannot be empty"))]
    pub asset_id: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub model_code: Option<String>,
    pub serial_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateMonitorInput {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub model_code: Option<String>,
    pub serial_number: Option<String>,
    pub status: Option<DeviceStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct MonitorFilters {
    pub status: Option<DeviceStatus>,
    /// Exact brand match
    pub brand: Option<String>,
    /// Substring match on asset id, brand, model, or serial number
    pub search: Option<String>,
}

#[derive(Clone)]
pub struct MonitorService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl MonitorService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filters: MonitorFilters) -> Result<Vec<monitor::Model>, ServiceError> {
        let mut query = Monitor::find().order_by_desc(monitor::Column::CreatedAt);
        if let Some(status) = filters.status {
            query = query.filter(monitor::Column::Status.eq(status.as_str()));
        }
        if let Some(brand) = filters.brand.as_deref().filter(|s| !s.trim().is_empty()) {
            query = query.filter(monitor::Column::Brand.eq(brand.trim()));
        }
        if let Some(search) = filters.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            query = query.filter(
                monitor::Column::AssetId
                    .like(&pattern)
                    .or(monitor::Column::Brand.like(&pattern))
                    .or(monitor::Column::Model.like(&pattern))
                    .or(monitor::Column::SerialNumber.like(&pattern)),
            );
        }
        Ok(query.all(self.db_pool.as_ref()).await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, monitor_id: Uuid) -> Result<monitor::Model, ServiceError> {
        Monitor::find_by_id(monitor_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Monitor {} not found", monitor_id)))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateMonitorInput) -> Result<monitor::Model, ServiceError> {
        input.validate()?;

        let model = monitor::ActiveModel {
            monitor_id: Set(Uuid::new_v4()),
            asset_id: Set(input.asset_id),
            brand: Set(input.brand),
            model: Set(input.model),
            model_code: Set(input.model_code),
            serial_number: Set(input.serial_number),
            status: Set(DeviceStatus::Available.as_str().to_owned()),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await?;

        info!(monitor_id = %model.monitor_id, asset_id = %model.asset_id, "monitor created");
        self.event_sender
            .send(Event::MonitorCreated(model.monitor_id))
            .await
            .map_err(ServiceError::EventError)?;
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        monitor_id: Uuid,
        input: UpdateMonitorInput,
    ) -> Result<monitor::Model, ServiceError> {
        input.validate()?;
        // retired is a laptop-only status
        if matches!(input.status, Some(DeviceStatus::Retired)) {
            return Err(ServiceError::ValidationError(
                "Monitors cannot be retired".into(),
            ));
        }

        let model = self.get(monitor_id).await?;
        let mut active: monitor::ActiveModel = model.into();
        active.brand = Set(input.brand);
        active.model = Set(input.model);
        active.model_code = Set(input.model_code);
        active.serial_number = Set(input.serial_number);
        if let Some(status) = input.status {
            active.status = Set(status.as_str().to_owned());
        }
        Ok(active.update(self.db_pool.as_ref()).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, monitor_id: Uuid) -> Result<(), ServiceError> {
        self.get(monitor_id).await?;
        Monitor::delete_by_id(monitor_id)
            .exec(self.db_pool.as_ref())
            .await?;

        info!(monitor_id = %monitor_id, "monitor deleted");
        self.event_sender
            .send(Event::MonitorDeleted(monitor_id))
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }
}
