//! # Authentication Middleware
//!
//! JWT authentication middleware for protecting API endpoints.

use ::auth::{extract_bearer_token, validate_token};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use entity::users::Role;
use error::{AppError, Result};

use crate::AppState;

/// User information extracted from a validated JWT
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User ID
    pub id:    String,
    /// User email
    pub email: String,
    /// Community role
    pub role:  Role,
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the JWT token (signature, expiry, issuer, audience)
/// 3. Adds authenticated user info to request extensions
/// 4. Rejects requests with invalid/missing tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid authorization header encoding"))?;

    let token = extract_bearer_token(auth_header)
        .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

    let claims = validate_token(&state.jwt_config, &token)?;

    let role = Role::from_string(&claims.role)
        .ok_or_else(|| AppError::unauthorized(format!("Unknown role claim '{}'", claims.role)))?;

    request.extensions_mut().insert(AuthenticatedUser {
        id: claims.sub,
        email: claims.email,
        role,
    });

    Ok(next.run(request).await)
}
