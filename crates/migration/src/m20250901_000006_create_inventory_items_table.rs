use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventoryItems::Table)
                    .if_not_exists()
                    .col(text(InventoryItems::Id).not_null().primary_key())
                    .col(string(InventoryItems::Name).not_null())
                    .col(integer(InventoryItems::Quantity).not_null().default(0))
                    .col(string(InventoryItems::Condition).not_null())
                    .col(string_null(InventoryItems::Location))
                    .col(string_null(InventoryItems::Note))
                    .col(
                        timestamp_with_time_zone(InventoryItems::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(InventoryItems::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum InventoryItems {
    Table,
    Id,
    Name,
    Quantity,
    Condition,
    Location,
    Note,
    CreatedAt,
    UpdatedAt,
}
