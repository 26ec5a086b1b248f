use sea_orm_migration::{prelude::*, schema::*, sea_query::extension::postgres::Type};
use sea_query::Alias;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create enum types first
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("user_role"))
                    .values(["admin", "rt", "rw", "bendahara", "sekretaris", "satpam", "warga"])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("user_status"))
                    .values(["active", "inactive", "away"])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(text(Users::Id).not_null().primary_key())
                    .col(string(Users::Email).not_null().unique_key())
                    .col(string(Users::Username).not_null().unique_key())
                    .col(string(Users::FullName).not_null())
                    .col(string(Users::PasswordHash).not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .custom(Alias::new("user_role"))
                            .not_null()
                            .default(Expr::cust("'warga'")),
                    )
                    .col(string_null(Users::Address))
                    .col(string_null(Users::Phone))
                    .col(string_null(Users::Position))
                    .col(
                        ColumnDef::new(Users::Status)
                            .custom(Alias::new("user_status"))
                            .not_null()
                            .default(Expr::cust("'active'")),
                    )
                    .col(boolean(Users::IsDeleted).not_null().default(false))
                    .col(timestamp_with_time_zone_null(Users::DeletedAt))
                    .col(string_null(Users::PushToken))
                    .col(
                        timestamp_with_time_zone(Users::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Users::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Soft-delete listings filter on these constantly
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_is_deleted")
                    .table(Users::Table)
                    .col(Users::IsDeleted)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(Alias::new("user_status")).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(Alias::new("user_role")).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    Email,
    Username,
    FullName,
    PasswordHash,
    Role,
    Address,
    Phone,
    Position,
    Status,
    IsDeleted,
    DeletedAt,
    PushToken,
    CreatedAt,
    UpdatedAt,
}
