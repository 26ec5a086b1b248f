//! Events Entity
//!
//! Community events carrying a donation/expense sub-ledger. The total columns
//! are derived from the donation and expense rows on every mutating save and
//! are never settable from the API.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:              String,
    pub name:            String,
    pub slug:            String,
    pub description:     Option<String>,
    pub event_date:      chrono::NaiveDate,
    /// Derived: sum of donation rows.
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total_donations: Decimal,
    /// Derived: sum of expense rows.
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total_expenses:  Decimal,
    /// Derived: donations minus expenses.
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub balance:         Decimal,
    pub status:          EventStatus,
    pub completed_at:    Option<chrono::DateTime<chrono::Utc>>,
    pub created_by:      String,
    pub created_at:      chrono::DateTime<chrono::Utc>,
    pub updated_at:      chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::event_donations::Entity")]
    Donations,
    #[sea_orm(has_many = "super::event_expenses::Entity")]
    Expenses,
}

impl Related<super::event_donations::Entity> for Entity {
    fn to() -> RelationDef { Relation::Donations.def() }
}

impl Related<super::event_expenses::Entity> for Entity {
    fn to() -> RelationDef { Relation::Expenses.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Event lifecycle status enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "event_status")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Created, no ledger entries yet
    #[sea_orm(string_value = "planning")]
    Planning,
    /// At least one donation or expense recorded
    #[sea_orm(string_value = "active")]
    Active,
    /// Closed; expenses forked into the general expense ledger
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl EventStatus {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "planning" => Some(EventStatus::Planning),
            "active" => Some(EventStatus::Active),
            "completed" => Some(EventStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Planning => write!(f, "planning"),
            EventStatus::Active => write!(f, "active"),
            EventStatus::Completed => write!(f, "completed"),
        }
    }
}
