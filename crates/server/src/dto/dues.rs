//! # Dues Data Transfer Objects
//!
//! Request and response types for the dues ("iuran") lifecycle endpoints.
//! Batch operations report per-item accounting rather than failing wholesale,
//! so their outcome types carry success and failure lists side by side.

use entity::dues::{self, DuesStatus, DuesType};
use error::PaginationMeta;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Response for a single dues record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuesResponse {
    pub id:             String,
    pub user_id:        String,
    /// Calendar-month key, "YYYY-MM"
    pub period:         String,
    pub amount:         Decimal,
    pub status:         DuesStatus,
    pub dues_type:      DuesType,
    pub description:    Option<String>,
    pub proof_image:    Option<String>,
    pub submitted_at:   Option<chrono::DateTime<chrono::Utc>>,
    pub confirmed_at:   Option<chrono::DateTime<chrono::Utc>>,
    pub confirmed_by:   Option<String>,
    pub recorded_by:    Option<String>,
    pub paid_at:        Option<chrono::DateTime<chrono::Utc>>,
    pub payment_method: Option<String>,
    pub note:           Option<String>,
    pub is_imported:    bool,
    pub created_at:     chrono::DateTime<chrono::Utc>,
}

impl From<dues::Model> for DuesResponse {
    fn from(model: dues::Model) -> Self {
        Self {
            id:             model.id,
            user_id:        model.user_id,
            period:         model.period,
            amount:         model.amount,
            status:         model.status,
            dues_type:      model.dues_type,
            description:    model.description,
            proof_image:    model.proof_image,
            submitted_at:   model.submitted_at,
            confirmed_at:   model.confirmed_at,
            confirmed_by:   model.confirmed_by,
            recorded_by:    model.recorded_by,
            paid_at:        model.paid_at,
            payment_method: model.payment_method,
            note:           model.note,
            is_imported:    model.is_imported,
            created_at:     model.created_at,
        }
    }
}

/// Query parameters for the dues list
#[derive(Debug, Clone, Deserialize)]
pub struct DuesListQuery {
    /// Page number (1-based, default: 1)
    pub page:      Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page:  Option<u64>,
    /// Filter by period ("YYYY-MM")
    pub period:    Option<String>,
    /// Filter by payment status
    pub status:    Option<String>,
    /// Filter by resident (officers only)
    pub user_id:   Option<String>,
    /// Filter by dues type (regular, custom)
    pub dues_type: Option<String>,
}

impl DuesListQuery {
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}

/// Response for a dues list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuesListResponse {
    pub dues:       Vec<DuesResponse>,
    pub pagination: PaginationMeta,
}

/// Request to generate regular dues for one period
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct GeneratePeriodicRequest {
    /// Target period ("YYYY-MM"); defaults to the current month
    pub period: Option<String>,

    /// Per-record amount; defaults to the fixed monthly amount
    pub amount: Option<Decimal>,

    /// Also generate for residents whose status is not active
    pub include_inactive: Option<bool>,

    /// Restrict generation to these resident ids
    pub target_users: Option<Vec<String>>,
}

/// Request to generate regular dues for all twelve periods of a year
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct GenerateYearlyRequest {
    /// Target year
    #[validate(range(min = 2000, max = 2100, message = "Year must be between 2000 and 2100"))]
    pub year: i32,

    /// Per-record amount; defaults to the fixed monthly amount
    pub amount: Option<Decimal>,

    /// Restrict generation to these resident ids
    pub target_users: Option<Vec<String>>,
}

/// Request to generate a one-off custom levy
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct GenerateCustomRequest {
    /// Target period ("YYYY-MM")
    #[validate(length(min = 1, message = "Period is required"))]
    pub period: String,

    /// Levy amount
    pub amount: Decimal,

    /// Purpose of the levy, e.g. "Iuran HUT RI"
    #[validate(length(
        min = 1,
        max = 255,
        message = "Description must be between 1 and 255 characters"
    ))]
    pub description: String,

    /// Restrict generation to these resident ids
    pub target_users: Option<Vec<String>>,
}

/// A resident for whom generation did not create a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationConflict {
    pub user_id: String,
    pub period:  String,
    pub reason:  String,
}

/// Outcome of a single-period generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    pub period:    String,
    /// Records created
    pub created:   usize,
    /// Residents skipped because a regular record already existed
    pub skipped:   usize,
    /// Per-resident refusals under strict period uniqueness
    pub conflicts: Vec<GenerationConflict>,
}

/// Per-resident accounting for a yearly generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyResidentOutcome {
    pub user_id: String,
    pub created: usize,
    pub skipped: usize,
}

/// Outcome of a yearly generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyGenerationSummary {
    pub year:          i32,
    pub total_created: usize,
    pub total_skipped: usize,
    pub residents:     Vec<YearlyResidentOutcome>,
}

/// Request to submit proof of payment for a dues record
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct SubmitProofRequest {
    /// Original filename of the proof image
    #[validate(length(min = 1, max = 255, message = "Filename must be between 1 and 255 characters"))]
    pub filename: String,

    /// Base64-encoded image bytes
    #[validate(length(min = 1, message = "Image data is required"))]
    pub data: String,
}

/// Request to confirm or reject a submitted proof
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateDuesStatusRequest {
    /// New status (paid, rejected)
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,

    /// Officer note, shown to the resident on rejection
    #[validate(length(max = 512, message = "Note must not exceed 512 characters"))]
    pub note: Option<String>,
}

/// Request to record an offline payment covering one or more periods
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    /// Paying resident
    #[validate(length(min = 1, message = "User id is required"))]
    pub user_id: String,

    /// Periods being paid ("YYYY-MM" each)
    #[validate(length(min = 1, message = "At least one period is required"))]
    pub periods: Vec<String>,

    /// Date the money changed hands; defaults to now
    pub payment_date: Option<chrono::DateTime<chrono::Utc>>,

    /// e.g. "tunai", "transfer"
    #[validate(length(max = 64, message = "Payment method must not exceed 64 characters"))]
    pub payment_method: Option<String>,

    /// Officer note
    #[validate(length(max = 512, message = "Note must not exceed 512 characters"))]
    pub note: Option<String>,
}

/// A period the bulk payment could not be applied to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodFailure {
    pub period: String,
    pub reason: String,
}

/// Outcome of a bulk payment; successes and failures always sum to the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordPaymentOutcome {
    /// Periods successfully marked paid
    pub paid_periods: Vec<String>,
    /// Periods that could not be paid, with reasons
    pub failures:     Vec<PeriodFailure>,
    /// Sum of the amounts marked paid
    pub total_paid:   Decimal,
}

/// Zero-filled per-status counts for one period
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSummaryResponse {
    pub period:   String,
    pub paid:     u64,
    pub pending:  u64,
    pub rejected: u64,
    pub unpaid:   u64,
    pub total:    u64,
}

/// A sheet row that could not be imported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRowFailure {
    /// 1-based data-row number (header excluded)
    pub row:    usize,
    pub reason: String,
}

/// Outcome of a spreadsheet import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Residents created because no (name, address) match existed
    pub residents_created: usize,
    /// Residents matched to existing accounts
    pub residents_matched: usize,
    /// Dues records written (paid and unpaid)
    pub dues_created:      usize,
    /// Rows skipped, with reasons
    pub failures:          Vec<ImportRowFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_request_requires_description() {
        let req = GenerateCustomRequest {
            period:       "2025-08".to_string(),
            amount:       Decimal::new(25_000, 0),
            description:  "".to_string(),
            target_users: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_yearly_request_year_bounds() {
        let req = GenerateYearlyRequest {
            year:         1995,
            amount:       None,
            target_users: None,
        };
        assert!(req.validate().is_err());

        let req = GenerateYearlyRequest {
            year:         2025,
            amount:       None,
            target_users: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_record_payment_requires_periods() {
        let req = RecordPaymentRequest {
            user_id:        "usr_1".to_string(),
            periods:        vec![],
            payment_date:   None,
            payment_method: None,
            note:           None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_dues_response_from_model() {
        let now = chrono::Utc::now();
        let model = dues::Model {
            id:             "iur_1".to_string(),
            user_id:        "usr_1".to_string(),
            period:         "2025-03".to_string(),
            amount:         Decimal::new(50_000, 0),
            status:         DuesStatus::Unpaid,
            dues_type:      DuesType::Regular,
            description:    None,
            proof_image:    None,
            submitted_at:   None,
            confirmed_at:   None,
            confirmed_by:   None,
            recorded_by:    None,
            paid_at:        None,
            payment_method: None,
            note:           None,
            is_imported:    false,
            created_at:     now,
            updated_at:     now,
        };

        let resp = DuesResponse::from(model);
        assert_eq!(resp.period, "2025-03");
        assert_eq!(resp.status, DuesStatus::Unpaid);
        assert!(!resp.is_imported);
    }
}
