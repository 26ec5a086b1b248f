//! # Authentication Data Transfer Objects
//!
//! Request and response types for login and profile endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::users::ResidentResponse;

/// Request body for user login
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// User's password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for registering a device push token
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct PushTokenRequest {
    /// Device token issued by the push provider
    #[validate(length(min = 1, max = 512, message = "Push token must be between 1 and 512 characters"))]
    pub push_token: String,
}

/// Response containing the access token and the authenticated profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponse {
    /// JWT access token for API requests
    pub access_token: String,

    /// Token expiration time in seconds
    pub expires_in: u64,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Authenticated resident profile
    pub user: ResidentResponse,
}
