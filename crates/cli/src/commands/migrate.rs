//! # CLI Migration Command
//!
//! Database migration handling for the Rukun CLI.

use error::Result;
use migration::MigratorTrait as _;

use crate::{commands::MigrateArgs, config::DatabaseConfig};

/// Runs database migrations, then seeds the defaults a fresh installation
/// needs (system settings, bootstrap admin).
pub async fn migrate(config: &DatabaseConfig, args: MigrateArgs) -> Result<()> {
    logging::info!(
        target: "migrate",
        dry_run = %args.dry_run,
        rollback = %args.rollback,
        "Running database migrations..."
    );

    let database_url = crate::config::build_database_url(config);

    let db = migration::connect_to_database(&database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

    if args.dry_run {
        // Dry run mode - just show what would happen
        let pending = migration::Migrator::get_pending_migrations(&db)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get pending migrations: {}", e))?;

        logging::info!(
            target: "migrate",
            pending_count = %pending.len(),
            "Pending migrations found"
        );

        for m in &pending {
            logging::info!(target: "migrate", migration = %m.name(), "Would apply");
        }

        return Ok(());
    }

    if args.rollback {
        logging::info!(target: "migrate", "Rolling back the last migration...");

        migration::Migrator::down(&db, None)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to rollback migration: {}", e))?;

        logging::info!(target: "migrate", "Rollback completed successfully");
        return Ok(());
    }

    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

    logging::info!(target: "migrate", "Migrations completed successfully");

    migration::seeds::run_all_seeds(&db, true)
        .await
        .map_err(|e| anyhow::anyhow!("Seeding failed: {}", e))?;

    logging::info!(target: "migrate", "Seed data completed successfully");
    Ok(())
}
