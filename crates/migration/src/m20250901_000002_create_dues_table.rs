//! Initial dues table.
//!
//! This iteration enforces one record per (user, period) with a unique
//! index; the index is dropped again by `m20250902_000001_add_dues_type`
//! when custom levies arrive.

use sea_orm_migration::{prelude::*, schema::*, sea_query::extension::postgres::Type};
use sea_query::Alias;

use crate::m20250901_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("dues_status"))
                    .values(["unpaid", "pending", "paid", "rejected"])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Dues::Table)
                    .if_not_exists()
                    .col(text(Dues::Id).not_null().primary_key())
                    .col(text(Dues::UserId).not_null())
                    .col(string(Dues::Period).not_null())
                    .col(decimal_len(Dues::Amount, 14, 2).not_null())
                    .col(
                        ColumnDef::new(Dues::Status)
                            .custom(Alias::new("dues_status"))
                            .not_null()
                            .default(Expr::cust("'unpaid'")),
                    )
                    .col(string_null(Dues::ProofImage))
                    .col(timestamp_with_time_zone_null(Dues::SubmittedAt))
                    .col(timestamp_with_time_zone_null(Dues::ConfirmedAt))
                    .col(text_null(Dues::ConfirmedBy))
                    .col(text_null(Dues::RecordedBy))
                    .col(timestamp_with_time_zone_null(Dues::PaidAt))
                    .col(string_null(Dues::PaymentMethod))
                    .col(string_null(Dues::Note))
                    .col(boolean(Dues::IsImported).not_null().default(false))
                    .col(
                        timestamp_with_time_zone(Dues::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Dues::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dues_user")
                            .from(Dues::Table, Dues::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_dues_user_period")
                    .table(Dues::Table)
                    .col(Dues::UserId)
                    .col(Dues::Period)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_dues_period_status")
                    .table(Dues::Table)
                    .col(Dues::Period)
                    .col(Dues::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Dues::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(Alias::new("dues_status")).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Dues {
    Table,
    Id,
    UserId,
    Period,
    Amount,
    Status,
    ProofImage,
    SubmittedAt,
    ConfirmedAt,
    ConfirmedBy,
    RecordedBy,
    PaidAt,
    PaymentMethod,
    Note,
    IsImported,
    CreatedAt,
    UpdatedAt,
}
