//! # JWT Token Management
//!
//! HS256 access-token issuance and validation. Token machinery is kept
//! deliberately thin: one token type, issuer/audience-checked, role carried
//! as a claim.

use std::{
    collections::HashSet,
    time::{Duration, SystemTime},
};

use cuid2::CuidConstructor;
use error::AppError;
use jsonwebtoken::{EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, AppError>;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Base64-encoded HMAC secret
    pub secret:             String,
    /// Access-token lifetime in seconds
    pub expiration_seconds: u64,
    /// Expected token issuer
    pub issuer:             String,
    /// Expected token audience
    pub audience:           String,
}

impl JwtConfig {
    /// Loads the JWT configuration from `RUKUN_JWT_*` environment variables.
    ///
    /// `RUKUN_JWT_SECRET` (base64) is required; the rest default.
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("RUKUN_JWT_SECRET")
            .map_err(|_| AppError::config("RUKUN_JWT_SECRET must be set (base64-encoded)"))?;

        let expiration_seconds = std::env::var("RUKUN_JWT_EXPIRATION_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        Ok(Self {
            secret,
            expiration_seconds,
            issuer: std::env::var("RUKUN_JWT_ISSUER").unwrap_or_else(|_| "rukun".to_string()),
            audience: std::env::var("RUKUN_JWT_AUDIENCE").unwrap_or_else(|_| "rukun-api".to_string()),
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// User email
    pub email: String,

    /// Community role (admin, rt, rw, bendahara, sekretaris, satpam, warga)
    pub role: String,

    /// Token issuer
    pub iss: String,

    /// Token audience
    pub aud: String,

    /// Expiration time (Unix timestamp)
    pub exp: u64,

    /// Issued at (Unix timestamp)
    pub iat: u64,

    /// Unique token ID
    pub jti: String,
}

/// Creates a new JWT access token for a resident or officer.
///
/// # Errors
///
/// Returns an error if the secret is not valid base64 or encoding fails.
pub fn create_access_token(config: &JwtConfig, user_id: &str, email: &str, role: &str) -> Result<String> {
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| AppError::internal(format!("Failed to get current time: {}", e)))?;

    let issued_at = now.as_secs();
    let expiration = now + Duration::from_secs(config.expiration_seconds);

    let claims = Claims {
        sub:   user_id.to_string(),
        email: email.to_string(),
        role:  role.to_string(),
        iss:   config.issuer.clone(),
        aud:   config.audience.clone(),
        exp:   expiration.as_secs(),
        iat:   issued_at,
        jti:   CuidConstructor::new().with_length(32).create_id(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_base64_secret(&config.secret)
            .map_err(|e| AppError::config(format!("Invalid JWT secret: {}", e)))?,
    )
    .map_err(|e| AppError::internal(format!("Failed to encode token: {}", e)))
}

/// Validates a JWT token and returns the claims.
///
/// Checks the signature, expiration, issuer, and audience.
pub fn validate_token(config: &JwtConfig, token: &str) -> Result<Claims> {
    let decoding_key = jsonwebtoken::DecodingKey::from_base64_secret(&config.secret)
        .map_err(|e| AppError::config(format!("Invalid JWT secret: {}", e)))?;

    let mut validation = Validation::default();
    validation.iss = Some(HashSet::from([config.issuer.clone()]));
    validation.aud = Some(HashSet::from([config.audience.clone()]));
    validation.validate_exp = true;

    let claims = jsonwebtoken::decode(token, &decoding_key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::JwtExpired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::JwtInvalidSignature,
            _ => AppError::JwtInvalidToken,
        }
    })?;

    Ok(claims.claims)
}

/// Extracts the Bearer token from an Authorization header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<String> {
    if !auth_header.starts_with("Bearer ") {
        return None;
    }

    let token = auth_header.trim_start_matches("Bearer ").trim();

    if token.is_empty() {
        return None;
    }

    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use base64::Engine;

    use super::*;

    fn test_config() -> JwtConfig {
        let secret = "test-secret-key-that-is-at-least-32-bytes-long";
        JwtConfig {
            secret:             base64::engine::general_purpose::STANDARD.encode(secret),
            expiration_seconds: 3600,
            issuer:             "rukun".to_string(),
            audience:           "rukun-api".to_string(),
        }
    }

    #[test]
    fn test_create_and_validate_token() {
        let config = test_config();

        let token = create_access_token(&config, "usr_123", "warga@rt05.id", "warga")
            .expect("Failed to create token");
        assert!(!token.is_empty());

        let claims = validate_token(&config, &token).expect("Failed to validate token");
        assert_eq!(claims.sub, "usr_123");
        assert_eq!(claims.email, "warga@rt05.id");
        assert_eq!(claims.role, "warga");
        assert_eq!(claims.iss, "rukun");
        assert_eq!(claims.aud, "rukun-api");
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let config = test_config();
        let token = create_access_token(&config, "usr_123", "warga@rt05.id", "warga").unwrap();

        let mut other = test_config();
        other.audience = "other-api".to_string();
        assert!(validate_token(&other, &token).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let config = test_config();
        let token = create_access_token(&config, "usr_123", "warga@rt05.id", "warga").unwrap();
        let tampered = format!("{}x", token);
        assert!(validate_token(&config, &tampered).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(
            extract_bearer_token("Bearer abc123"),
            Some("abc123".to_string())
        );
        assert!(extract_bearer_token("Basic abc123").is_none());
        assert!(extract_bearer_token("Bearer").is_none());
        assert!(extract_bearer_token("").is_none());
    }
}
