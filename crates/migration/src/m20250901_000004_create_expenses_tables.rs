use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250901_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(text(Expenses::Id).not_null().primary_key())
                    .col(string(Expenses::Title).not_null())
                    .col(string(Expenses::Slug).not_null().unique_key())
                    .col(decimal_len(Expenses::Total, 14, 2).not_null())
                    .col(text(Expenses::CreatedBy).not_null())
                    .col(text_null(Expenses::EventId))
                    .col(
                        timestamp_with_time_zone(Expenses::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Expenses::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenses_creator")
                            .from(Expenses::Table, Expenses::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExpenseItems::Table)
                    .if_not_exists()
                    .col(text(ExpenseItems::Id).not_null().primary_key())
                    .col(text(ExpenseItems::ExpenseId).not_null())
                    .col(string(ExpenseItems::Name).not_null())
                    .col(decimal_len(ExpenseItems::Price, 14, 2).not_null())
                    .col(string_null(ExpenseItems::Image))
                    .col(
                        timestamp_with_time_zone(ExpenseItems::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expense_items_expense")
                            .from(ExpenseItems::Table, ExpenseItems::ExpenseId)
                            .to(Expenses::Table, Expenses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExpenseItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Expenses {
    Table,
    Id,
    Title,
    Slug,
    Total,
    CreatedBy,
    EventId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum ExpenseItems {
    Table,
    Id,
    ExpenseId,
    Name,
    Price,
    Image,
    CreatedAt,
}
