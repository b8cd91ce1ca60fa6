use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cabins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub location: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::maintenance_tasks::Entity")]
    MaintenanceTasks,
}

impl Related<super::maintenance_tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceTasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
