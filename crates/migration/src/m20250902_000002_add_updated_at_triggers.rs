//! Migration: automatic updated_at timestamp triggers.
//!
//! Adds a PostgreSQL trigger per table so `updated_at` stays correct even
//! when a write path forgets to set it.
//!
//! Tables affected:
//! - users
//! - dues
//! - expenses
//! - events
//! - inventory_items
//! - system_settings

use sea_orm_migration::prelude::*;

const TABLES: [&str; 6] = [
    "users",
    "dues",
    "expenses",
    "events",
    "inventory_items",
    "system_settings",
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE OR REPLACE FUNCTION update_updated_at_column()
                RETURNS TRIGGER AS $$
                BEGIN
                    NEW.updated_at = CURRENT_TIMESTAMP;
                    RETURN NEW;
                END;
                $$ language 'plpgsql';
            "#,
            )
            .await?;

        for table in TABLES {
            let trigger_name = format!("update_{}_updated_at", table);
            let sql = format!(
                "DROP TRIGGER IF EXISTS {} ON {}; CREATE TRIGGER {} BEFORE UPDATE ON {} FOR EACH ROW EXECUTE FUNCTION \
                 update_updated_at_column()",
                trigger_name, table, trigger_name, table
            );
            manager.get_connection().execute_unprepared(&sql).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in TABLES {
            let trigger_name = format!("update_{}_updated_at", table);
            let sql = format!("DROP TRIGGER IF EXISTS {} ON {}", trigger_name, table);
            manager.get_connection().execute_unprepared(&sql).await?;
        }

        manager
            .get_connection()
            .execute_unprepared("DROP FUNCTION IF EXISTS update_updated_at_column()")
            .await?;

        Ok(())
    }
}
