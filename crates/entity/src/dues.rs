//! Dues Entity
//!
//! One "iuran" record per (resident, period[, type]). Regular records are
//! created by scheduled generation; custom records are one-off levies and are
//! never deduplicated. Whether two *regular* records may share a period is a
//! runtime setting, not a schema constraint: the unique index on
//! (user_id, period) existed in an early migration and was dropped when
//! `dues_type` was introduced.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "dues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:             String,
    pub user_id:        String,
    /// Calendar-month key, `"YYYY-MM"`.
    pub period:         String,
    /// Fixed-point amount in currency minor units; serialized as a string.
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount:         Decimal,
    pub status:         DuesStatus,
    pub dues_type:      DuesType,
    /// Free-text purpose for custom levies.
    pub description:    Option<String>,
    /// Reference to the stored proof-of-payment image.
    pub proof_image:    Option<String>,
    pub submitted_at:   Option<chrono::DateTime<chrono::Utc>>,
    pub confirmed_at:   Option<chrono::DateTime<chrono::Utc>>,
    /// Officer who confirmed or rejected the payment.
    pub confirmed_by:   Option<String>,
    /// Officer who recorded an offline bulk payment.
    pub recorded_by:    Option<String>,
    pub paid_at:        Option<chrono::DateTime<chrono::Utc>>,
    pub payment_method: Option<String>,
    pub note:           Option<String>,
    /// Back-filled from spreadsheet import; excluded from balance income.
    pub is_imported:    bool,
    pub created_at:     chrono::DateTime<chrono::Utc>,
    pub updated_at:     chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Dues payment status enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "dues_status")]
#[serde(rename_all = "lowercase")]
pub enum DuesStatus {
    /// No payment recorded yet
    #[sea_orm(string_value = "unpaid")]
    Unpaid,
    /// Proof submitted, waiting for officer confirmation
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Payment confirmed or recorded
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Proof rejected; resident may resubmit
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl DuesStatus {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "unpaid" => Some(DuesStatus::Unpaid),
            "pending" => Some(DuesStatus::Pending),
            "paid" => Some(DuesStatus::Paid),
            "rejected" => Some(DuesStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for DuesStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuesStatus::Unpaid => write!(f, "unpaid"),
            DuesStatus::Pending => write!(f, "pending"),
            DuesStatus::Paid => write!(f, "paid"),
            DuesStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Dues type enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "dues_type")]
#[serde(rename_all = "lowercase")]
pub enum DuesType {
    /// Scheduled monthly dues at the fixed amount
    #[sea_orm(string_value = "regular")]
    Regular,
    /// One-off levy (event-specific or administrative)
    #[sea_orm(string_value = "custom")]
    Custom,
}

impl DuesType {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "regular" => Some(DuesType::Regular),
            "custom" => Some(DuesType::Custom),
            _ => None,
        }
    }
}

impl std::fmt::Display for DuesType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuesType::Regular => write!(f, "regular"),
            DuesType::Custom => write!(f, "custom"),
        }
    }
}
