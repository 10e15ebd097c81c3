use crate::{
    db::DbPool,
    entities::laptop::{self, Entity as Laptop},
    errors::ServiceError,
    events::{Event, EventSender},
    models::DeviceStatus,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Laptops whose warranty ends within this many days count as expiring.
const WARRANTY_WARNING_DAYS: i64 = 90;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateLaptopInput {
    #[validate(length(min = 1, message = "Asset id cannot be empty"))]
    pub asset_id: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub system_model: Option<String>,
    pub serial_number: Option<String>,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub storage: Option<String>,
    pub storage_type: Option<String>,
    pub operating_system: Option<String>,
    pub distributor: Option<String>,
    pub unit: Option<String>,
    pub warranty_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateLaptopInput {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub system_model: Option<String>,
    pub serial_number: Option<String>,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub storage: Option<String>,
    pub storage_type: Option<String>,
    pub operating_system: Option<String>,
    pub distributor: Option<String>,
    pub unit: Option<String>,
    pub warranty_end: Option<NaiveDate>,
    pub status: Option<DeviceStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LaptopFilters {
    /// Filter by lifecycle status
    pub status: Option<DeviceStatus>,
    /// Exact brand match
    pub brand: Option<String>,
    /// Substring match on asset id, brand, model, or serial number
    pub search: Option<String>,
}

/// Laptop row plus the derived warranty field.
#[derive(Debug, Serialize, ToSchema)]
pub struct LaptopView {
    #[serde(flatten)]
    pub laptop: laptop::Model,
    pub warranty_status: String,
}

/// Derives the display warranty state from the warranty end date.
pub fn warranty_status(warranty_end: Option<NaiveDate>, today: NaiveDate) -> String {
    match warranty_end {
        None => "Unknown".to_string(),
        Some(end) if end < today => "Expired".to_string(),
        Some(end) => {
            let days_left = (end - today).num_days();
            if days_left <= WARRANTY_WARNING_DAYS {
                format!("{} days left", days_left)
            } else {
                "Active".to_string()
            }
        }
    }
}

#[derive(Clone)]
pub struct LaptopService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl LaptopService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    fn view(model: laptop::Model) -> LaptopView {
        let status = warranty_status(model.warranty_end, Utc::now().date_naive());
        LaptopView {
            laptop: model,
            warranty_status: status,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filters: LaptopFilters) -> Result<Vec<LaptopView>, ServiceError> {
        let mut query = Laptop::find().order_by_desc(laptop::Column::CreatedAt);
        if let Some(status) = filters.status {
            query = query.filter(laptop::Column::Status.eq(status.as_str()));
        }
        if let Some(brand) = filters.brand.as_deref().filter(|s| !s.trim().is_empty()) {
            query = query.filter(laptop::Column::Brand.eq(brand.trim()));
        }
        if let Some(search) = filters.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim());
            query = query.filter(
                laptop::Column::AssetId
                    .like(&pattern)
                    .or(laptop::Column::Brand.like(&pattern))
                    .or(laptop::Column::Model.like(&pattern))
                    .or(laptop::Column::SerialNumber.like(&pattern)),
            );
        }
        let rows = query.all(self.db_pool.as_ref()).await?;
        Ok(rows.into_iter().map(Self::view).collect())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, laptop_id: Uuid) -> Result<LaptopView, ServiceError> {
        let model = Laptop::find_by_id(laptop_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Laptop {} not found", laptop_id)))?;
        Ok(Self::view(model))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateLaptopInput) -> Result<LaptopView, ServiceError> {
        input.validate()?;

        let model = laptop::ActiveModel {
            laptop_id: Set(Uuid::new_v4()),
            asset_id: Set(input.asset_id),
            brand: Set(input.brand),
            model: Set(input.model),
            system_model: Set(input.system_model),
            serial_number: Set(input.serial_number),
            cpu: Set(input.cpu),
            memory: Set(input.memory),
            storage: Set(input.storage),
            storage_type: Set(input.storage_type),
            operating_system: Set(input.operating_system),
            distributor: Set(input.distributor),
            unit: Set(input.unit),
            warranty_end: Set(input.warranty_end),
            status: Set(DeviceStatus::Available.as_str().to_owned()),
            ..Default::default()
        }
        .insert(self.db_pool.as_ref())
        .await?;

        info!(laptop_id = %model.laptop_id, asset_id = %model.asset_id, "laptop created");
        self.event_sender
            .send(Event::LaptopCreated(model.laptop_id))
            .await
            .map_err(ServiceError::EventError)?;
        Ok(Self::view(model))
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        laptop_id: Uuid,
        input: UpdateLaptopInput,
    ) -> Result<LaptopView, ServiceError> {
        input.validate()?;

        let model = Laptop::find_by_id(laptop_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Laptop {} not found", laptop_id)))?;

        let mut active: laptop::ActiveModel = model.into();
        active.brand = Set(input.brand);
        active.model = Set(input.model);
        active.system_model = Set(input.system_model);
        active.serial_number = Set(input.serial_number);
        active.cpu = Set(input.cpu);
        active.memory = Set(input.memory);
        active.storage = Set(input.storage);
        active.storage_type = Set(input.storage_type);
        active.operating_system = Set(input.operating_system);
        active.distributor = Set(input.distributor);
        active.unit = Set(input.unit);
        active.warranty_end = Set(input.warranty_end);
        if let Some(status) = input.status {
            active.status = Set(status.as_str().to_owned());
        }
        let model = active.update(self.db_pool.as_ref()).await?;
        Ok(Self::view(model))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, laptop_id: Uuid) -> Result<(), ServiceError> {
        let model = Laptop::find_by_id(laptop_id)
            .one(self.db_pool.as_ref())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Laptop {} not found", laptop_id)))?;

        laptop::Entity::delete_by_id(model.laptop_id)
            .exec(self.db_pool.as_ref())
            .await?;

        info!(laptop_id = %laptop_id, "laptop deleted");
        self.event_sender
            .send(Event::LaptopDeleted(laptop_id))
            .await
            .map_err(ServiceError::EventError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn missing_warranty_is_unknown() {
        assert_eq!(warranty_status(None, date(2026, 8, 27)), "Unknown");
    }

    #[test]
    fn past_warranty_is_expired() {
        assert_eq!(
            warranty_status(Some(date(2026, 8, 26)), date(2026, 8, 27)),
            "Expired"
        );
    }

    #[test]
    fn warranty_within_threshold_shows_days_left() {
        assert_eq!(
            warranty_status(Some(date(2026, 9, 26)), date(2026, 8, 27)),
            "30 days left"
        );
        // boundary: exactly the warning window
        assert_eq!(
            warranty_status(Some(date(2026, 11, 25)), date(2026, 8, 27)),
            "90 days left"
        );
    }

    #[test]
    fn distant_warranty_is_active() {
        assert_eq!(
            warranty_status(Some(date(2027, 8, 27)), date(2026, 8, 27)),
            "Active"
        );
    }

    #[test]
    fn warranty_ending_today_is_zero_days_left() {
        assert_eq!(
            warranty_status(Some(date(2026, 8, 27)), date(2026, 8, 27)),
            "0 days left"
        );
    }
}
