use sea_orm_migration::{prelude::*, schema::*, sea_query::extension::postgres::Type};
use sea_query::Alias;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("event_status"))
                    .values(["planning", "active", "completed"])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(text(Events::Id).not_null().primary_key())
                    .col(string(Events::Name).not_null())
                    .col(string(Events::Slug).not_null().unique_key())
                    .col(string_null(Events::Description))
                    .col(date(Events::EventDate).not_null())
                    .col(
                        decimal_len(Events::TotalDonations, 14, 2)
                            .not_null()
                            .default(Expr::cust("0")),
                    )
                    .col(
                        decimal_len(Events::TotalExpenses, 14, 2)
                            .not_null()
                            .default(Expr::cust("0")),
                    )
                    .col(
                        decimal_len(Events::Balance, 14, 2)
                            .not_null()
                            .default(Expr::cust("0")),
                    )
                    .col(
                        ColumnDef::new(Events::Status)
                            .custom(Alias::new("event_status"))
                            .not_null()
                            .default(Expr::cust("'planning'")),
                    )
                    .col(timestamp_with_time_zone_null(Events::CompletedAt))
                    .col(text(Events::CreatedBy).not_null())
                    .col(
                        timestamp_with_time_zone(Events::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Events::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventDonations::Table)
                    .if_not_exists()
                    .col(text(EventDonations::Id).not_null().primary_key())
                    .col(text(EventDonations::EventId).not_null())
                    .col(string(EventDonations::DonorName).not_null())
                    .col(decimal_len(EventDonations::Amount, 14, 2).not_null())
                    .col(date(EventDonations::DonatedAt).not_null())
                    .col(
                        timestamp_with_time_zone(EventDonations::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_donations_event")
                            .from(EventDonations::Table, EventDonations::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventExpenses::Table)
                    .if_not_exists()
                    .col(text(EventExpenses::Id).not_null().primary_key())
                    .col(text(EventExpenses::EventId).not_null())
                    .col(string(EventExpenses::Description).not_null())
                    .col(decimal_len(EventExpenses::Amount, 14, 2).not_null())
                    .col(date(EventExpenses::SpentAt).not_null())
                    .col(string_null(EventExpenses::Category))
                    .col(
                        json_binary(EventExpenses::ProofImages)
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        timestamp_with_time_zone(EventExpenses::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_expenses_event")
                            .from(EventExpenses::Table, EventExpenses::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventExpenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EventDonations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("event_status")).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Events {
    Table,
    Id,
    Name,
    Slug,
    Description,
    EventDate,
    TotalDonations,
    TotalExpenses,
    Balance,
    Status,
    CompletedAt,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum EventDonations {
    Table,
    Id,
    EventId,
    DonorName,
    Amount,
    DonatedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum EventExpenses {
    Table,
    Id,
    EventId,
    Description,
    Amount,
    SpentAt,
    Category,
    ProofImages,
    CreatedAt,
}
