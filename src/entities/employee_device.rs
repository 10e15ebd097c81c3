use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::models::{DeviceKind, DeviceRef};

/// One deployment episode: a device (and optionally monitors) held by an
/// employee from `date_issued` until `date_returned`. The device reference is
/// polymorphic: `device_type` tags which catalog table `device_id` points at.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(table_name = "employee_devices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub employee_device_id: Uuid,
    pub employee_id: Uuid,
    pub device_type: String,
    pub device_id: Uuid,
    pub status: String,
    pub date_issued: NaiveDate,
    pub date_returned: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// Resolve the stored tag + id pair back into the variant type.
    pub fn device_ref(&self) -> Result<DeviceRef, DbErr> {
        let kind = DeviceKind::from_str(&self.device_type).map_err(|_| {
            DbErr::Custom(format!(
                "employee_device {} has unknown device_type {:?}",
                self.employee_device_id, self.device_type
            ))
        })?;
        Ok(DeviceRef::new(kind, self.device_id))
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::EmployeeId"
    )]
    Employee,
    #[sea_orm(has_many = "super::employee_monitor::Entity")]
    EmployeeMonitors,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::employee_monitor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmployeeMonitors.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr> {
        let mut active_model = self;
        let now = Utc::now();
        if insert {
            active_model.created_at = Set(now);
        }
        active_model.updated_at = Set(Some(now));
        Ok(active_model)
    }
}
