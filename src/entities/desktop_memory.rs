use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(table_name = "desktop_memory")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub memory_id: Uuid,
    pub desktop_id: Uuid,
    pub slot_number: i32,
    pub size_gb: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::desktop::Entity",
        from = "Column::DesktopId",
        to = "super::desktop::Column::DesktopId",
        on_delete = "Cascade"
    )]
    Desktop,
}

impl Related<super::desktop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Desktop.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
