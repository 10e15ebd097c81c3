use crate::{
    db::DbPool,
    entities::{
        desktop::{self, Entity as Desktop},
        desktop_memory::{self, Entity as DesktopMemory},
        desktop_storage::{self, Entity as DesktopStorage},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    models::DeviceStatus,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct MemoryModuleInput {
    #[validate(range(min = 1, max = 16, message = "Slot number out of range"))]
    pub slot_number: i32,
    #[validate(range(min = 1, message = "Module size must be positive"))]
    pub size_gb: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct StorageDeviceInput {
    #[validate(length(min = 1, message = "Storage type cannot be empty"))]
    pub storage_type: String,
    #[validate(range(min = 1, message = "Capacity must be positive"))]
    pub capacity_gb: i32,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DesktopFilters {
    pub status: Option<DeviceStatus>,
    /// Substring match on asset id or processor
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateDesktopInput {
    #[validate(length(min = 1, message = "Asset id cannot be empty"))]
    pub asset_id: String,
    pub processor: Option<String>,
    pub operating_system: Option<String>,
    #[serde(default)]
    #[validate]
    pub memory: Vec<MemoryModuleInput>,
    #[serde(default)]
    #[validate]
    pub storage: Vec<StorageDeviceInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateDesktopInput {
    pub processor: Option<String>,
    pub operating_system: Option<String>,
    pub status: Option<DeviceStatus>,
    #[serde(default)]
    #[validate]
    pub memory: Vec<MemoryModuleInput>,
    #[serde(default)]
    #[validate]
    pub storage: Vec<StorageDeviceInput>,
}

/// Desktop row with its owned child collections and derived capacity totals.
#[derive(Debug, Serialize, ToSchema)]
pub struct DesktopView {
    #[serde(flatten)]
    pub desktop: desktop::Model,
    pub memory: Vec<desktop_memory::Model>,
    pub storage: Vec<desktop_storage::Model>,
    pub total_memory_gb: i64,
    pub total_storage: String,
}

/// Formats a capacity sum for display, switching from GB to TB at 1000 GB.
pub fn format_capacity(total_gb: i64) -> String {
    if total_gb >= 1000 {
        let tb = total_gb as f64 / 1000.0;
        if (tb - tb.trunc()).abs() < f64::EPSILON {
            format!("{} TB", tb as i64)
        } else {
            format!("{:.1} TB", tb)
        }
    } else {
        format!("{} GB", total_gb)
    }
}

#[derive(Clone)]
pub struct DesktopService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl DesktopService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn load_view<C: ConnectionTrait>(
        db: &C,
        model: desktop::Model,
    ) -> Result<DesktopView, ServiceError> {
        let memory = DesktopMemory::find()
            .filter(desktop_memory::Column::DesktopId.eq(model.desktop_id))
            .order_by_asc(desktop_memory::Column::SlotNumber)
            .all(db)
            .await?;
        let storage = DesktopStorage::find()
            .filter(desktop_storage::Column::DesktopId.eq(model.desktop_id))
            .all(db)
            .await?;

        let total_memory_gb = memory.iter().map(|m| m.size_gb as i64).sum();
        let total_storage_gb: i64 = storage.iter().map(|s| s.capacity_gb as i64).sum();

        Ok(DesktopView {
            desktop: model,
            memory,
            storage,
            total_memory_gb,
            total_storage: format_capacity(total_storage_gb),
        })
    }

    /// Children are replaced wholesale: delete everything for the desktop,
    /// then insert the submitted set. No per-slot diffing.
    async fn replace_children<C: ConnectionTrait>(
        db: &C,
        desktop_id: Uuid,
        memory: &[MemoryModuleInput],
        storage: &[StorageDeviceInput],
    ) -> Result<(), ServiceError> {
        DesktopMemory::delete_many()
            .filter(desktop_memory::Column::DesktopId.eq(desktop_id))
            .exec(db)
            .await?;
        DesktopStorage::delete_many()
            .filter(desktop_storage::Column::DesktopId.eq(desktop_id))
            .exec(db)
            .await?;

        for module in memory {
            desktop_memory::ActiveModel {
                memory_id: Set(Uuid::new_v4()),
                desktop_id: Set(desktop_id),
                slot_number: Set(module.slot_number),
                size_gb: Set(module.size_gb),
            }
            .insert(db)
            .await?;
        }
        for device in storage {
            desktop_storage::ActiveModel {
                storage_id: Set(Uuid::new_v4()),
                desktop_id: Set(desktop_id),
                storage_type: Set(device.storage_type.clone()),
                capacity_gb: Set(device.capacity_gb),
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filters: DesktopFilters) -> Result<Vec<DesktopView>, ServiceError> {
        let db = self.db_pool.as_ref();
        let mut query = Desktop::find().order_by_desc(desktop::Column::CreatedAt);
        if let Some(status) = filters.status {
            query = query.filter(desktop::Column::Status.eq(status.as_str()));
        }
        if let Some(search) = filters.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            query = query.filter(
                desktop::Column::AssetId
                    .like(&pattern)
                    .or(desktop::Column::Processor.like(&pattern)),
            );
        }
        let rows = query.all(db).await?;
        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            views.push(Self::load_view(db, row).await?);
        }
        Ok(views)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, desktop_id: Uuid) -> Result<DesktopView, ServiceError> {
        let db = self.db_pool.as_ref();
        let model = Desktop::find_by_id(desktop_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Desktop {} not found", desktop_id)))?;
        Self::load_view(db, model).await
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateDesktopInput) -> Result<DesktopView, ServiceError> {
        input.validate()?;

        let model = self
            .db_pool
            .transaction::<_, desktop::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let model = desktop::ActiveModel {
                        desktop_id: Set(Uuid::new_v4()),
                        asset_id: Set(input.asset_id.clone()),
                        processor: Set(input.processor.clone()),
                        operating_system: Set(input.operating_system.clone()),
                        status: Set(DeviceStatus::Available.as_str().to_owned()),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    Self::replace_children(txn, model.desktop_id, &input.memory, &input.storage)
                        .await?;
                    Ok(model)
                })
            })
            .await
            .map_err(unwrap_txn_err)?;

        info!(desktop_id = %model.desktop_id, asset_id = %model.asset_id, "desktop created");
        self.event_sender
            .send(Event::DesktopCreated(model.desktop_id))
            .await
            .map_err(ServiceError::EventError)?;

        Self::load_view(self.db_pool.as_ref(), model).await
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        desktop_id: Uuid,
        input: UpdateDesktopInput,
    ) -> Result<DesktopView, ServiceError> {
        input.validate()?;
        // retired is a laptop-only status
        if matches!(input.status, Some(DeviceStatus::Retired)) {
            return Err(ServiceError::ValidationError(
                "Desktops cannot be retired".into(),
            ));
        }

        let model = self
            .db_pool
            .transaction::<_, desktop::Model, ServiceError>(|txn| {
                Box::pin(async move {
                    let model = Desktop::find_by_id(desktop_id).one(txn).await?.ok_or_else(
                        || ServiceError::NotFound(format!("Desktop {} not found", desktop_id)),
                    )?;

                    let mut active: desktop::ActiveModel = model.into();
                    active.processor = Set(input.processor.clone());
                    active.operating_system = Set(input.operating_system.clone());
                    if let Some(status) = input.status {
                        active.status = Set(status.as_str().to_owned());
                    }
                    let model = active.update(txn).await?;

                    Self::replace_children(txn, desktop_id, &input.memory, &input.storage).await?;
                    Ok(model)
                })
            })
            .await
            .map_err(unwrap_txn_err)?;

        Self::load_view(self.db_pool.as_ref(), model).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, desktop_id: Uuid) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        Desktop::find_by_id(desktop_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Desktop {} not found", desktop_id)))?;

        // child rows cascade with the parent
        Desktop::delete_by_id(desktop_id).exec(db).await?;

        info!(desktop_id = %desktop_id, "desktop deleted");
        self.event_sender
            .send(Event::DesktopDeleted(desktop_id))
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }
}

fn unwrap_txn_err(e: TransactionError<ServiceError>) -> ServiceError {
    match e {
        TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
        TransactionError::Transaction(service_err) => service_err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_totals_stay_in_gb() {
        assert_eq!(format_capacity(512), "512 GB");
        assert_eq!(format_capacity(0), "0 GB");
    }

    #[test]
    fn totals_switch_to_tb_at_one_thousand() {
        assert_eq!(format_capacity(1000), "1 TB");
        assert_eq!(format_capacity(2000), "2 TB");
        assert_eq!(format_capacity(1500), "1.5 TB");
    }

    #[test]
    fn memory_input_bounds_are_enforced() {
        let bad = MemoryModuleInput {
            slot_number: 0,
            size_gb: 8,
        };
        assert!(bad.validate().is_err());
        let ok = MemoryModuleInput {
            slot_number: 1,
            size_gb: 16,
        };
        assert!(ok.validate().is_ok());
    }
}
