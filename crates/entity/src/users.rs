//! Users Entity
//!
//! Residents and officers of the community. Officers are residents with an
//! elevated role (rt, rw, bendahara, sekretaris, satpam); `admin` is the
//! system operator account and is excluded from dues generation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:            String,
    pub email:         String,
    pub username:      String,
    pub full_name:     String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role:          Role,
    pub address:       Option<String>,
    pub phone:         Option<String>,
    pub position:      Option<String>,
    pub status:        UserStatus,
    /// Soft-delete flag. Deleted residents keep their paid dues history.
    pub is_deleted:    bool,
    pub deleted_at:    Option<chrono::DateTime<chrono::Utc>>,
    /// Push-notification device token, set by the mobile client.
    pub push_token:    Option<String>,
    pub created_at:    chrono::DateTime<chrono::Utc>,
    pub updated_at:    chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::dues::Entity")]
    Dues,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::dues::Entity> for Entity {
    fn to() -> RelationDef { Relation::Dues.def() }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef { Relation::Expenses.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Community role enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System operator; never receives dues records
    #[sea_orm(string_value = "admin")]
    Admin,
    /// RT (neighborhood unit) head
    #[sea_orm(string_value = "rt")]
    Rt,
    /// RW (community unit) head
    #[sea_orm(string_value = "rw")]
    Rw,
    /// Treasurer; confirms payments and manages expenses
    #[sea_orm(string_value = "bendahara")]
    Bendahara,
    /// Secretary; manages events and inventory
    #[sea_orm(string_value = "sekretaris")]
    Sekretaris,
    /// Security staff
    #[sea_orm(string_value = "satpam")]
    Satpam,
    /// Ordinary resident
    #[sea_orm(string_value = "warga")]
    Warga,
}

impl Role {
    /// Roles with dues-management and expense authority.
    pub fn is_officer(self) -> bool {
        matches!(self, Role::Admin | Role::Rt | Role::Rw | Role::Bendahara)
    }

    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "rt" => Some(Role::Rt),
            "rw" => Some(Role::Rw),
            "bendahara" => Some(Role::Bendahara),
            "sekretaris" => Some(Role::Sekretaris),
            "satpam" => Some(Role::Satpam),
            "warga" => Some(Role::Warga),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Rt => write!(f, "rt"),
            Role::Rw => write!(f, "rw"),
            Role::Bendahara => write!(f, "bendahara"),
            Role::Sekretaris => write!(f, "sekretaris"),
            Role::Satpam => write!(f, "satpam"),
            Role::Warga => write!(f, "warga"),
        }
    }
}

/// Resident lifecycle status enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_status")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Resident lives in the community and owes dues
    #[sea_orm(string_value = "active")]
    Active,
    /// Resident no longer participates
    #[sea_orm(string_value = "inactive")]
    Inactive,
    /// Resident is temporarily away
    #[sea_orm(string_value = "away")]
    Away,
}

impl UserStatus {
    #[must_use]
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "active" => Some(UserStatus::Active),
            "inactive" => Some(UserStatus::Inactive),
            "away" => Some(UserStatus::Away),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
            UserStatus::Away => write!(f, "away"),
        }
    }
}
