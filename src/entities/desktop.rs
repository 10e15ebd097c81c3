use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(table_name = "desktops")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub desktop_id: Uuid,
    pub asset_id: String,
    pub processor: Option<String>,
    pub operating_system: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::desktop_memory::Entity")]
    MemoryModules,
    #[sea_orm(has_many = "super::desktop_storage::Entity")]
    StorageDevices,
}

impl Related<super::desktop_memory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MemoryModules.def()
    }
}

impl Related<super::desktop_storage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StorageDevices.def()
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
