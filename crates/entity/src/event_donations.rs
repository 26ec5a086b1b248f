//! Event Donations Entity
//!
//! A single donation line in an event's fundraising ledger.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "event_donations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id:         String,
    pub event_id:   String,
    pub donor_name: String,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount:     Decimal,
    pub donated_at: chrono::NaiveDate,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id"
    )]
    Event,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef { Relation::Event.def() }
}

impl ActiveModelBehavior for ActiveModel {}
