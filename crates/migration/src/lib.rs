//! # Rukun Database Migrations
//!
//! Sea-ORM migration history for the Rukun backend. Migrations are executed
//! in the order they appear in [`Migrator::migrations`]; the
//! `add_dues_type` step deliberately drops the (user_id, period) unique
//! index that the initial dues migration created, so regular and custom
//! records can coexist per period.

pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_users_table;
mod m20250901_000002_create_dues_table;
mod m20250901_000003_create_system_settings_table;
mod m20250901_000004_create_expenses_tables;
mod m20250901_000005_create_events_tables;
mod m20250901_000006_create_inventory_items_table;
mod m20250902_000001_add_dues_type;
mod m20250902_000002_add_updated_at_triggers;

pub mod seeds;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_users_table::Migration),
            Box::new(m20250901_000002_create_dues_table::Migration),
            Box::new(m20250901_000003_create_system_settings_table::Migration),
            Box::new(m20250901_000004_create_expenses_tables::Migration),
            Box::new(m20250901_000005_create_events_tables::Migration),
            Box::new(m20250901_000006_create_inventory_items_table::Migration),
            Box::new(m20250902_000001_add_dues_type::Migration),
            Box::new(m20250902_000002_add_updated_at_triggers::Migration),
        ]
    }
}

/// Database connection helper for CLI usage
pub async fn connect_to_database(database_url: &str) -> Result<sea_orm::DatabaseConnection, sea_orm::DbErr> {
    sea_orm::Database::connect(database_url).await
}

/// Builds a DATABASE_URL from the `RUKUN_DATABASE_*` environment variables.
pub fn database_url_from_env() -> Result<String, std::env::VarError> {
    Ok(format!(
        "postgres://{}:{}@{}:{}/{}",
        std::env::var("RUKUN_DATABASE_USER")?,
        std::env::var("RUKUN_DATABASE_PASSWORD")?,
        std::env::var("RUKUN_DATABASE_HOST")?,
        std::env::var("RUKUN_DATABASE_PORT")?,
        std::env::var("RUKUN_DATABASE_NAME")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_ordered() {
        let migrations = Migrator::migrations();
        assert_eq!(migrations.len(), 8);
        // The dues-type migration (which drops the period unique index) must
        // come after the dues table exists.
        let names: Vec<String> = migrations.iter().map(|m| m.name().to_string()).collect();
        let create_dues = names.iter().position(|n| n.contains("create_dues")).unwrap();
        let add_type = names.iter().position(|n| n.contains("add_dues_type")).unwrap();
        assert!(create_dues < add_type);
    }
}
