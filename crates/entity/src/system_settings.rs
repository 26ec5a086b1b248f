//! System Settings Entity
//!
//! Generic key-value configuration store. Seeded defaults include the
//! administrator-set `initial_balance` offset and the
//! `strict_period_uniqueness` dues-generation guard.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Administrator-set opening balance offset (decimal string, default "0").
pub const INITIAL_BALANCE: &str = "initial_balance";
/// When "true", regular dues generation refuses a second record per
/// (resident, period) even across officer-forced paths.
pub const STRICT_PERIOD_UNIQUENESS: &str = "strict_period_uniqueness";
/// Day of month (1-28) on which due-date reminders are fanned out.
pub const REMINDER_DAY: &str = "reminder_day";
/// Last period for which scheduled generation ran, e.g. "2025-08".
pub const LAST_GENERATED_PERIOD: &str = "last_generated_period";
/// Last period for which the reminder fan-out ran.
pub const LAST_REMINDED_PERIOD: &str = "last_reminded_period";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "system_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:          String,
    #[sea_orm(unique)]
    pub key:         String,
    pub value:       String,
    pub description: Option<String>,
    pub updated_at:  chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
