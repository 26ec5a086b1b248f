//! # Resident Data Transfer Objects
//!
//! Request and response types for resident management endpoints.

use entity::users::{self, Role, UserStatus};
use error::PaginationMeta;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Response for a resident profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResidentResponse {
    /// Resident's unique identifier
    pub id:         String,
    /// Resident's email address
    pub email:      String,
    /// Resident's login name
    pub username:   String,
    /// Resident's full name
    pub full_name:  String,
    /// Community role
    pub role:       Role,
    /// House address within the community
    pub address:    Option<String>,
    /// Contact phone number
    pub phone:      Option<String>,
    /// Free-text position, e.g. "Ketua RT 05"
    pub position:   Option<String>,
    /// Residency status
    pub status:     UserStatus,
    /// Soft-delete flag
    pub is_deleted: bool,
    /// Account creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last update timestamp
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<users::Model> for ResidentResponse {
    fn from(model: users::Model) -> Self {
        Self {
            id:         model.id,
            email:      model.email,
            username:   model.username,
            full_name:  model.full_name,
            role:       model.role,
            address:    model.address,
            phone:      model.phone,
            position:   model.position,
            status:     model.status,
            is_deleted: model.is_deleted,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Request to register a new resident
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct RegisterResidentRequest {
    /// Resident's email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Login name
    #[validate(length(
        min = 3,
        max = 64,
        message = "Username must be between 3 and 64 characters"
    ))]
    pub username: String,

    /// Resident's full name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Full name must be between 1 and 255 characters"
    ))]
    pub full_name: String,

    /// Initial password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Community role (defaults to warga)
    pub role: Option<String>,

    /// House address
    #[validate(length(max = 255, message = "Address must not exceed 255 characters"))]
    pub address: Option<String>,

    /// Contact phone number
    #[validate(length(max = 32, message = "Phone must not exceed 32 characters"))]
    pub phone: Option<String>,

    /// Free-text position
    #[validate(length(max = 128, message = "Position must not exceed 128 characters"))]
    pub position: Option<String>,
}

/// Request to update a resident profile
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateResidentRequest {
    /// New full name
    #[validate(length(
        min = 1,
        max = 255,
        message = "Full name must be between 1 and 255 characters"
    ))]
    pub full_name: Option<String>,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New community role
    pub role: Option<String>,

    /// New house address
    #[validate(length(max = 255, message = "Address must not exceed 255 characters"))]
    pub address: Option<String>,

    /// New phone number
    #[validate(length(max = 32, message = "Phone must not exceed 32 characters"))]
    pub phone: Option<String>,

    /// New position
    #[validate(length(max = 128, message = "Position must not exceed 128 characters"))]
    pub position: Option<String>,
}

/// Request to change a resident's residency status
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateResidentStatusRequest {
    /// New status (active, inactive, away)
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
}

/// Response for a resident list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResidentListResponse {
    /// Residents on this page
    pub residents:  Vec<ResidentResponse>,
    /// Pagination info
    pub pagination: PaginationMeta,
}

/// Query parameters for the resident list
#[derive(Debug, Clone, Deserialize)]
pub struct ResidentListQuery {
    /// Page number (1-based, default: 1)
    pub page:            Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page:        Option<u64>,
    /// Search term matched against name, username, email, address
    pub search:          Option<String>,
    /// Filter by residency status
    pub status:          Option<String>,
    /// Filter by role
    pub role:            Option<String>,
    /// Include soft-deleted residents (default: false)
    pub include_deleted: Option<bool>,
}

impl ResidentListQuery {
    pub fn page(&self) -> u64 { self.page.unwrap_or(1).max(1) }

    pub fn per_page(&self) -> u64 { self.per_page.unwrap_or(20).clamp(1, 100) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let req = RegisterResidentRequest {
            email:     "budi@rt05.id".to_string(),
            username:  "budi".to_string(),
            full_name: "Budi Santoso".to_string(),
            password:  "rahasia-kuat1".to_string(),
            role:      None,
            address:   Some("Blok C2 No. 14".to_string()),
            phone:     None,
            position:  None,
        };
        assert!(req.validate().is_ok());

        let bad_email = RegisterResidentRequest {
            email: "not-an-email".to_string(),
            ..req.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterResidentRequest {
            password: "short".to_string(),
            ..req
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_list_query_defaults_and_clamps() {
        let query = ResidentListQuery {
            page:            None,
            per_page:        None,
            search:          None,
            status:          None,
            role:            None,
            include_deleted: None,
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 20);

        let query = ResidentListQuery {
            page:            Some(0),
            per_page:        Some(500),
            search:          None,
            status:          None,
            role:            None,
            include_deleted: None,
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(), 100);
    }
}
