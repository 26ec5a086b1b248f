//! # Seed Data Management
//!
//! Seeds the database with the data a fresh installation needs: the default
//! system settings (initial balance, uniqueness guard, reminder day) and a
//! bootstrap admin account.

use std::time::Instant;

use ::error::{AppError, SeedResult};
use auth::secrecy::{ExposeSecret, SecretString};
use chrono::Utc;
use entity::system_settings;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};

/// Trait for seed data providers
#[async_trait::async_trait]
pub trait SeedProvider {
    /// The name of this seed
    fn name(&self) -> &str;

    /// Runs the seed operation. Must be idempotent: seeds run on every
    /// startup.
    async fn run(&self, db: &DatabaseConnection) -> Result<SeedResult, AppError>;
}

/// Default system settings inserted when their key is absent
const DEFAULT_SETTINGS: &[(&str, &str, &str)] = &[
    (
        system_settings::INITIAL_BALANCE,
        "0",
        "Opening balance offset added to the computed community balance. Set once when adopting the system with an \
         existing treasury.",
    ),
    (
        system_settings::STRICT_PERIOD_UNIQUENESS,
        "false",
        "When true, regular dues generation rejects a second record for the same resident and period instead of \
         skipping silently.",
    ),
    (
        system_settings::REMINDER_DAY,
        "25",
        "Day of the month on which unpaid-dues reminders are sent to residents.",
    ),
];

/// Seeds the default system settings.
pub struct DefaultSettingsSeed;

#[async_trait::async_trait]
impl SeedProvider for DefaultSettingsSeed {
    fn name(&self) -> &str { "default_settings" }

    async fn run(&self, db: &DatabaseConnection) -> Result<SeedResult, AppError> {
        let started = Instant::now();
        let mut inserted = 0;

        for (key, value, description) in DEFAULT_SETTINGS {
            let exists = entity::SystemSettings::find()
                .filter(system_settings::Column::Key.eq(*key))
                .count(db)
                .await?
                > 0;
            if exists {
                continue;
            }

            system_settings::ActiveModel {
                id:          Set(entity::new_id("set")),
                key:         Set(key.to_string()),
                value:       Set(value.to_string()),
                description: Set(Some(description.to_string())),
                updated_at:  Set(Utc::now()),
            }
            .insert(db)
            .await
            .map_err(|e| AppError::database(format!("Failed to seed setting {}: {}", key, e)))?;

            inserted += 1;
        }

        Ok(SeedResult::success(
            self.name(),
            inserted,
            started.elapsed().as_millis() as u64,
        ))
    }
}

/// Seeds a bootstrap admin account when the users table is empty.
///
/// The password comes from `RUKUN_ADMIN_PASSWORD`; without it the seed is
/// skipped so an unconfigured deployment never ships a known credential.
pub struct DefaultAdminSeed;

#[async_trait::async_trait]
impl SeedProvider for DefaultAdminSeed {
    fn name(&self) -> &str { "default_admin" }

    async fn run(&self, db: &DatabaseConnection) -> Result<SeedResult, AppError> {
        let started = Instant::now();

        let user_count = entity::Users::find().count(db).await?;
        if user_count > 0 {
            return Ok(SeedResult::success(self.name(), 0, started.elapsed().as_millis() as u64));
        }

        let Ok(password) = std::env::var("RUKUN_ADMIN_PASSWORD") else {
            tracing::warn!("RUKUN_ADMIN_PASSWORD not set; skipping admin seed");
            return Ok(SeedResult::success(self.name(), 0, started.elapsed().as_millis() as u64));
        };

        let hash = auth::password::hash_password(&SecretString::from(password), None)
            .map_err(|e| AppError::internal(format!("Failed to hash admin password: {}", e)))?;

        entity::users::ActiveModel {
            id:            Set(entity::new_id("usr")),
            email:         Set("admin@rukun.local".to_string()),
            username:      Set("admin".to_string()),
            full_name:     Set("Administrator".to_string()),
            password_hash: Set(hash.expose_secret().to_string()),
            role:          Set(entity::users::Role::Admin),
            status:        Set(entity::users::UserStatus::Active),
            is_deleted:    Set(false),
            created_at:    Set(Utc::now()),
            updated_at:    Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(|e| AppError::database(format!("Failed to seed admin user: {}", e)))?;

        tracing::info!("Seeded bootstrap admin account");

        Ok(SeedResult::success(self.name(), 1, started.elapsed().as_millis() as u64))
    }
}

/// Runs all registered seed providers in order.
pub async fn run_all_seeds(db: &DatabaseConnection, verbose: bool) -> Result<Vec<SeedResult>, AppError> {
    let providers: Vec<Box<dyn SeedProvider + Send + Sync>> =
        vec![Box::new(DefaultSettingsSeed), Box::new(DefaultAdminSeed)];

    let mut results = Vec::with_capacity(providers.len());
    for provider in providers {
        let result = provider.run(db).await?;
        if verbose {
            tracing::info!(
                seed = %result.seed_name,
                inserted = result.inserted_count,
                duration_ms = result.duration_ms,
                "Seed completed"
            );
        }
        results.push(result);
    }

    Ok(results)
}
