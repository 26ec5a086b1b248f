//! # Event Data Transfer Objects
//!
//! Request and response types for community events and their
//! donation/expense sub-ledgers.

use entity::events::{self, EventStatus};
use entity::{event_donations, event_expenses};
use error::PaginationMeta;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Response for an event with derived totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventResponse {
    pub id:              String,
    pub name:            String,
    pub slug:            String,
    pub description:     Option<String>,
    pub event_date:      chrono::NaiveDate,
    /// Sum of donation rows
    pub total_donations: Decimal,
    /// Sum of expense rows
    pub total_expenses:  Decimal,
    /// Donations minus expenses
    pub balance:         Decimal,
    pub status:          EventStatus,
    pub completed_at:    Option<chrono::DateTime<chrono::Utc>>,
    pub created_by:      String,
    pub created_at:      chrono::DateTime<chrono::Utc>,
}

impl From<events::Model> for EventResponse {
    fn from(model: events::Model) -> Self {
        Self {
            id:              model.id,
            name:            model.name,
            slug:            model.slug,
            description:     model.description,
            event_date:      model.event_date,
            total_donations: model.total_donations,
            total_expenses:  model.total_expenses,
            balance:         model.balance,
            status:          model.status,
            completed_at:    model.completed_at,
            created_by:      model.created_by,
            created_at:      model.created_at,
        }
    }
}

/// A donation line in an event detail response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DonationResponse {
    pub id:         String,
    pub donor_name: String,
    pub amount:     Decimal,
    pub donated_at: chrono::NaiveDate,
}

impl From<event_donations::Model> for DonationResponse {
    fn from(model: event_donations::Model) -> Self {
        Self {
            id:         model.id,
            donor_name: model.donor_name,
            amount:     model.amount,
            donated_at: model.donated_at,
        }
    }
}

/// An expense line in an event detail response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventExpenseResponse {
    pub id:           String,
    pub description:  String,
    pub amount:       Decimal,
    pub spent_at:     chrono::NaiveDate,
    pub category:     Option<String>,
    pub proof_images: serde_json::Value,
}

impl From<event_expenses::Model> for EventExpenseResponse {
    fn from(model: event_expenses::Model) -> Self {
        Self {
            id:           model.id,
            description:  model.description,
            amount:       model.amount,
            spent_at:     model.spent_at,
            category:     model.category,
            proof_images: model.proof_images,
        }
    }
}

/// Full event detail: the event plus both ledgers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event:     EventResponse,
    pub donations: Vec<DonationResponse>,
    pub expenses:  Vec<EventExpenseResponse>,
}

/// Request to create an event
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateEventRequest {
    /// Event name, e.g. "Agustusan 2025"
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    /// Optional description
    #[validate(length(max = 2048, message = "Description must not exceed 2048 characters"))]
    pub description: Option<String>,

    /// Date the event takes place
    pub event_date: chrono::NaiveDate,
}

/// Request to update an event
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 2048, message = "Description must not exceed 2048 characters"))]
    pub description: Option<String>,

    pub event_date: Option<chrono::NaiveDate>,
}

/// Request to add a donation to an event's ledger
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct AddDonationRequest {
    /// Donor name as it should appear in the ledger
    #[validate(length(min = 1, max = 255, message = "Donor name must be between 1 and 255 characters"))]
    pub donor_name: String,

    /// Donation amount
    pub amount: Decimal,

    /// Date of the donation; defaults to today
    pub donated_at: Option<chrono::NaiveDate>,
}

/// Request to add an expense to an event's ledger
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct AddEventExpenseRequest {
    /// What the money was spent on
    #[validate(length(min = 1, max = 255, message = "Description must be between 1 and 255 characters"))]
    pub description: String,

    /// Expense amount
    pub amount: Decimal,

    /// Date of the purchase; defaults to today
    pub spent_at: Option<chrono::NaiveDate>,

    /// Optional category, e.g. "konsumsi"
    #[validate(length(max = 128, message = "Category must not exceed 128 characters"))]
    pub category: Option<String>,

    /// Stored proof-image references
    pub proof_images: Option<Vec<String>>,
}

/// Outcome of completing an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompleteEventResponse {
    pub event: EventResponse,
    /// Number of expense records forked into the general ledger
    pub expenses_created: usize,
    /// Surplus/deficit/balanced summary sentence
    pub narrative: String,
}

/// Query parameters for the event list
#[derive(Debug, Clone, Deserialize)]
pub struct EventListQuery {
    /// Page number (1-based, default: 1)
    pub page:     Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page: Option<u64>,
    /// Filter by lifecycle status
    pub status:   Option<String>,
}

impl EventListQuery {
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}

/// Response for an event list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventListResponse {
    pub events:     Vec<EventResponse>,
    pub pagination: PaginationMeta,
}
