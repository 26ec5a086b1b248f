//! Migration: introduce custom levies.
//!
//! Adds the `dues_type` column (regular | custom) and a `description` for
//! custom levies, and drops the (user_id, period) unique index: a resident
//! may now carry a regular record and any number of custom records for the
//! same period. Runtime uniqueness for regular records is governed by the
//! `strict_period_uniqueness` setting instead of the schema.

use sea_orm_migration::{prelude::*, schema::*, sea_query::extension::postgres::Type};
use sea_query::Alias;

use crate::m20250901_000002_create_dues_table::Dues;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum DuesNewColumns {
    DuesType,
    Description,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("dues_type"))
                    .values(["regular", "custom"])
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Dues::Table)
                    .add_column(
                        ColumnDef::new(DuesNewColumns::DuesType)
                            .custom(Alias::new("dues_type"))
                            .not_null()
                            .default(Expr::cust("'regular'")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Dues::Table)
                    .add_column(string_null(DuesNewColumns::Description))
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("uq_dues_user_period")
                    .table(Dues::Table)
                    .to_owned(),
            )
            .await?;

        // Non-unique replacement keeps period lookups fast
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_dues_user_period")
                    .table(Dues::Table)
                    .col(Dues::UserId)
                    .col(Dues::Period)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_dues_user_period")
                    .table(Dues::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_dues_user_period")
                    .table(Dues::Table)
                    .col(Dues::UserId)
                    .col(Dues::Period)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Dues::Table)
                    .drop_column(DuesNewColumns::Description)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Dues::Table)
                    .drop_column(DuesNewColumns::DuesType)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_type(Type::drop().name(Alias::new("dues_type")).to_owned())
            .await?;

        Ok(())
    }
}
