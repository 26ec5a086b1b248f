//! Expense Items Entity
//!
//! A single purchased line within an expense record.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expense_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:         String,
    pub expense_id: String,
    pub name:       String,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub price:      Decimal,
    /// Reference to a stored receipt image.
    pub image:      Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id"
    )]
    Expense,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef { Relation::Expense.def() }
}

impl ActiveModelBehavior for ActiveModel {}
