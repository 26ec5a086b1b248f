//! # Settings Handlers
//!
//! HTTP request handlers for the key-value settings store plus typed
//! accessors for the settings the engine consults at runtime
//! (`initial_balance`, `strict_period_uniqueness`, `reminder_day`).

use axum::Json;
use chrono::Utc;
use entity::system_settings::{self, Entity as SettingsEntity};
use error::{AppError, Result};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{middleware::auth::AuthenticatedUser, AppState};

/// Response type for a single setting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingResponse {
    pub key:         String,
    pub value:       String,
    pub description: Option<String>,
    pub updated_at:  chrono::DateTime<Utc>,
}

impl From<system_settings::Model> for SettingResponse {
    fn from(model: system_settings::Model) -> Self {
        Self {
            key:         model.key,
            value:       model.value,
            description: model.description,
            updated_at:  model.updated_at,
        }
    }
}

/// Request type for updating a setting
#[derive(Debug, Clone, Validate, Deserialize)]
pub struct UpdateSettingRequest {
    #[validate(length(min = 1, max = 1024, message = "Value must be between 1 and 1024 characters"))]
    pub value: String,

    #[validate(length(max = 512, message = "Description must be at most 512 characters"))]
    pub description: Option<String>,
}

/// Inner handler: list all settings.
pub async fn list_settings_inner(state: &AppState, user: &AuthenticatedUser) -> Result<Json<Vec<SettingResponse>>> {
    ::auth::require_permission(
        user.role,
        ::auth::Permission::Settings(::auth::permissions::SettingAction::Read),
    )?;

    let settings = SettingsEntity::find()
        .order_by_asc(system_settings::Column::Key)
        .all(&state.db)
        .await?;

    Ok(Json(settings.into_iter().map(SettingResponse::from).collect()))
}

/// Inner handler: fetch one setting by key.
pub async fn get_setting_inner(state: &AppState, user: &AuthenticatedUser, key: &str) -> Result<Json<SettingResponse>> {
    ::auth::require_permission(
        user.role,
        ::auth::Permission::Settings(::auth::permissions::SettingAction::Read),
    )?;

    let setting = find_setting(&state.db, key)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Setting '{}' not found", key)))?;

    Ok(Json(setting.into()))
}

/// Inner handler: update a setting, creating it when missing.
pub async fn update_setting_inner(
    state: &AppState,
    user: &AuthenticatedUser,
    key: &str,
    req: UpdateSettingRequest,
) -> Result<Json<SettingResponse>> {
    req.validate().map_err(AppError::from)?;

    ::auth::require_permission(
        user.role,
        ::auth::Permission::Settings(::auth::permissions::SettingAction::Update),
    )?;

    let updated = match find_setting(&state.db, key).await? {
        Some(existing) => {
            let mut active: system_settings::ActiveModel = existing.into();
            active.value = Set(req.value);
            if req.description.is_some() {
                active.description = Set(req.description);
            }
            active.updated_at = Set(Utc::now());
            active.update(&state.db).await?
        },
        None => {
            system_settings::ActiveModel {
                id:          Set(entity::new_id("set")),
                key:         Set(key.to_string()),
                value:       Set(req.value),
                description: Set(req.description),
                updated_at:  Set(Utc::now()),
            }
            .insert(&state.db)
            .await?
        },
    };

    logging::info!(target: "settings", key = %key, updated_by = %user.id, "Setting updated");

    Ok(Json(updated.into()))
}

async fn find_setting(db: &DatabaseConnection, key: &str) -> Result<Option<system_settings::Model>> {
    Ok(SettingsEntity::find()
        .filter(system_settings::Column::Key.eq(key))
        .one(db)
        .await?)
}

/// Raw value of a setting, if present.
pub async fn get_setting_value(db: &DatabaseConnection, key: &str) -> Result<Option<String>> {
    Ok(find_setting(db, key).await?.map(|s| s.value))
}

/// Store a setting value without touching its description.
pub async fn set_setting_value(db: &DatabaseConnection, key: &str, value: &str) -> Result<()> {
    match find_setting(db, key).await? {
        Some(existing) => {
            let mut active: system_settings::ActiveModel = existing.into();
            active.value = Set(value.to_string());
            active.updated_at = Set(Utc::now());
            active.update(db).await?;
        },
        None => {
            system_settings::ActiveModel {
                id:          Set(entity::new_id("set")),
                key:         Set(key.to_string()),
                value:       Set(value.to_string()),
                description: Set(None),
                updated_at:  Set(Utc::now()),
            }
            .insert(db)
            .await?;
        },
    }
    Ok(())
}

/// Check if a boolean setting is enabled ("true" or "1").
pub async fn is_setting_enabled(db: &DatabaseConnection, key: &str) -> Result<bool> {
    Ok(get_setting_value(db, key)
        .await?
        .map(|v| parse_enabled(&v))
        .unwrap_or(false))
}

/// Administrator-set opening balance; zero when unset or malformed.
pub async fn initial_balance(db: &DatabaseConnection) -> Result<Decimal> {
    Ok(get_setting_value(db, system_settings::INITIAL_BALANCE)
        .await?
        .and_then(|v| v.parse().ok())
        .unwrap_or(Decimal::ZERO))
}

/// Day of month on which unpaid-dues reminders fire. Defaults to 25.
pub async fn reminder_day(db: &DatabaseConnection) -> Result<u32> {
    Ok(get_setting_value(db, system_settings::REMINDER_DAY)
        .await?
        .and_then(|v| v.parse().ok())
        .filter(|d| (1..=31).contains(d))
        .unwrap_or(25))
}

fn parse_enabled(value: &str) -> bool { matches!(value.trim().to_lowercase().as_str(), "true" | "1") }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_enabled() {
        assert!(parse_enabled("true"));
        assert!(parse_enabled("TRUE"));
        assert!(parse_enabled("1"));
        assert!(parse_enabled(" true "));
        assert!(!parse_enabled("false"));
        assert!(!parse_enabled("yes"));
        assert!(!parse_enabled(""));
    }

    #[test]
    fn test_update_request_validation() {
        let req = UpdateSettingRequest {
            value:       "".to_string(),
            description: None,
        };
        assert!(req.validate().is_err());

        let req = UpdateSettingRequest {
            value:       "150000".to_string(),
            description: Some("Saldo awal kas".to_string()),
        };
        assert!(req.validate().is_ok());
    }
}
