use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

use crate::m20251019_000001_create_cabins_table::Cabins;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum MaintenanceTasks {
    Table,
    Id,
    CabinId,
    Description,
    Priority,
    Status,
    CreatedAt,
    UpdatedAt,
}

const TASK_PRIORITY: &str = "task_priority";
const TASK_STATUS: &str = "task_status";
const PRIORITY_VALUES: [&str; 3] = ["High", "Medium", "Low"];
const STATUS_VALUES: [&str; 3] = ["Pending", "In Progress", "Complete"];
const DEFAULT_PRIORITY: &str = "Medium";
const DEFAULT_STATUS: &str = "Pending";

const FK_TASKS_TO_CABINS: &str = "fk-maintenance_tasks-cabin_id";
const IDX_TASKS_CABIN_ID: &str = "idx-maintenance_tasks-cabin_id";

fn enum_values(values: [&'static str; 3]) -> impl Iterator<Item = Alias> {
    values.into_iter().map(Alias::new)
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new(TASK_PRIORITY))
                    .values(enum_values(PRIORITY_VALUES))
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new(TASK_STATUS))
                    .values(enum_values(STATUS_VALUES))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MaintenanceTasks::Table)
                    .if_not_exists()
                    .col(uuid(MaintenanceTasks::Id).primary_key())
                    .col(uuid(MaintenanceTasks::CabinId))
                    .col(text(MaintenanceTasks::Description))
                    .col(
                        enumeration(
                            MaintenanceTasks::Priority,
                            Alias::new(TASK_PRIORITY),
                            enum_values(PRIORITY_VALUES),
                        )
                        .default(DEFAULT_PRIORITY),
                    )
                    .col(
                        enumeration(
                            MaintenanceTasks::Status,
                            Alias::new(TASK_STATUS),
                            enum_values(STATUS_VALUES),
                        )
                        .default(DEFAULT_STATUS),
                    )
                    .col(
                        timestamp_with_time_zone(MaintenanceTasks::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(MaintenanceTasks::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TASKS_TO_CABINS)
                            .from(MaintenanceTasks::Table, MaintenanceTasks::CabinId)
                            .to(Cabins::Table, Cabins::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_TASKS_CABIN_ID)
                    .table(MaintenanceTasks::Table)
                    .col(MaintenanceTasks::CabinId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MaintenanceTasks::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new(TASK_STATUS)).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new(TASK_PRIORITY)).to_owned())
            .await
    }
}
