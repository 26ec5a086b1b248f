//! Expenses Entity
//!
//! "Pengeluaran" records in the general expense ledger. Created directly by
//! treasurer roles, or indirectly when an event completes (one record per
//! event-expense line, with `event_id` back-referencing the origin).

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:         String,
    pub title:      String,
    pub slug:       String,
    /// Derived: sum of line-item prices.
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total:      Decimal,
    pub created_by: String,
    /// Set when this record was forked from a completed event.
    pub event_id:   Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expense_items::Entity")]
    Items,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Creator,
}

impl Related<super::expense_items::Entity> for Entity {
    fn to() -> RelationDef { Relation::Items.def() }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::Creator.def() }
}

impl ActiveModelBehavior for ActiveModel {}
