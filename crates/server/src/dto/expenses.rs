//! # Expense Data Transfer Objects
//!
//! Request and response types for the general expense ("pengeluaran")
//! ledger. Totals are always derived from line items server-side.

use entity::{expense_items, expenses};
use error::PaginationMeta;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single line item in an expense response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseItemResponse {
    pub id:    String,
    pub name:  String,
    pub price: Decimal,
    pub image: Option<String>,
}

impl From<expense_items::Model> for ExpenseItemResponse {
    fn from(model: expense_items::Model) -> Self {
        Self {
            id:    model.id,
            name:  model.name,
            price: model.price,
            image: model.image,
        }
    }
}

/// Response for an expense record with its line items
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseResponse {
    pub id:         String,
    pub title:      String,
    pub slug:       String,
    /// Sum of line-item prices
    pub total:      Decimal,
    pub created_by: String,
    /// Set when this record was forked from a completed event
    pub event_id:   Option<String>,
    pub items:      Vec<ExpenseItemResponse>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ExpenseResponse {
    pub fn from_parts(expense: expenses::Model, items: Vec<expense_items::Model>) -> Self {
        Self {
            id:         expense.id,
            title:      expense.title,
            slug:       expense.slug,
            total:      expense.total,
            created_by: expense.created_by,
            event_id:   expense.event_id,
            items:      items.into_iter().map(ExpenseItemResponse::from).collect(),
            created_at: expense.created_at,
            updated_at: expense.updated_at,
        }
    }
}

/// A line item in a create/update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ExpenseItemRequest {
    /// Item name
    #[validate(length(min = 1, max = 255, message = "Item name must be between 1 and 255 characters"))]
    pub name: String,

    /// Item price
    pub price: Decimal,

    /// Stored receipt-image reference
    #[validate(length(max = 512, message = "Image reference must not exceed 512 characters"))]
    pub image: Option<String>,
}

/// Request to create an expense
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateExpenseRequest {
    /// Expense title
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    /// Line items; the expense total is their sum
    #[validate(length(min = 1, message = "At least one item is required"))]
    #[validate(nested)]
    pub items: Vec<ExpenseItemRequest>,
}

/// Request to update an expense
///
/// When `items` is present the line items are replaced wholesale and the
/// total is recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateExpenseRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,

    /// Replacement line items
    #[validate(nested)]
    pub items: Option<Vec<ExpenseItemRequest>>,
}

/// Query parameters for the expense list
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseListQuery {
    /// Page number (1-based, default: 1)
    pub page:     Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page: Option<u64>,
    /// Search term matched against the title
    pub search:   Option<String>,
}

impl ExpenseListQuery {
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}

/// Response for an expense list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseListResponse {
    pub expenses:   Vec<ExpenseResponse>,
    pub pagination: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_requires_items() {
        let req = CreateExpenseRequest {
            title: "Perbaikan pos ronda".to_string(),
            items: vec![],
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_nested_item_validation() {
        let req = CreateExpenseRequest {
            title: "Perbaikan pos ronda".to_string(),
            items: vec![ExpenseItemRequest {
                name:  "".to_string(),
                price: Decimal::new(120_000, 0),
                image: None,
            }],
        };
        assert!(req.validate().is_err());
    }
}
