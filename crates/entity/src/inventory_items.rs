//! Inventory Items Entity
//!
//! Community-owned goods (chairs, tents, sound systems) tracked by the
//! secretary. Plain CRUD resource.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:         String,
    pub name:       String,
    pub quantity:   i32,
    /// Free-text condition, e.g. "baik", "rusak ringan".
    pub condition:  String,
    pub location:   Option<String>,
    pub note:       Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
