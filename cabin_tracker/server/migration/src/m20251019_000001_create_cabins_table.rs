use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cabins::Table)
                    .if_not_exists()
                    .col(uuid(Cabins::Id).primary_key())
                    .col(string_len(Cabins::Name, 255))
                    .col(string_len(Cabins::Location, 255))
                    .col(text_null(Cabins::Description))
                    .col(
                        timestamp_with_time_zone(Cabins::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cabins::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Cabins {
    Table,
    Id,
    Name,
    Location,
    Description,
    CreatedAt,
}
