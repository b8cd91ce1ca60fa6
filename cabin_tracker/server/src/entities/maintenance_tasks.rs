use super::sea_orm_active_enums::{TaskPriority, TaskStatus};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "maintenance_tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub cabin_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cabins::Entity",
        from = "Column::CabinId",
        to = "super::cabins::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Cabins,
}

impl Related<super::cabins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cabins.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
