use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Links a monitor to a deployment episode. Rows outlive the episode: once
/// the parent assignment is returned they remain as the historical record of
/// which monitors accompanied it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(table_name = "employee_monitors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub employee_monitor_id: Uuid,
    pub employee_device_id: Uuid,
    pub monitor_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee_device::Entity",
        from = "Column::EmployeeDeviceId",
        to = "super::employee_device::Column::EmployeeDeviceId",
        on_delete = "Cascade"
    )]
    EmployeeDevice,
    #[sea_orm(
        belongs_to = "super::monitor::Entity",
        from = "Column::MonitorId",
        to = "super::monitor::Column::MonitorId"
    )]
    Monitor,
}

impl Related<super::employee_device::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeDevice.def()
    }
}

impl Related<super::monitor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Monitor.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr> {
        let mut active_model = self;
        if insert {
            active_model.created_at = Set(Utc::now());
        }
        Ok(active_model)
    }
}
