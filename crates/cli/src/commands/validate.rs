//! # CLI Validate Command
//!
//! Configuration validation for the Rukun CLI.

use error::{AppError, Result};

/// Validates the CLI configuration
///
/// Checks the environment variables the server refuses to start without.
pub fn validate() -> Result<()> {
    let required_vars = [
        "RUKUN_DATABASE_HOST",
        "RUKUN_DATABASE_PORT",
        "RUKUN_DATABASE_NAME",
        "RUKUN_DATABASE_USER",
        "RUKUN_DATABASE_PASSWORD",
        "RUKUN_JWT_SECRET",
    ];

    let mut missing = Vec::new();
    for var in &required_vars {
        if std::env::var(var).is_err() {
            missing.push(var);
        }
    }

    if !missing.is_empty() {
        return Err(AppError::validation(format!(
            "Missing required environment variables: {:?}",
            missing
        )));
    }

    crate::config::DatabaseConfig::from_env()
        .map_err(|e| AppError::validation(format!("Invalid database configuration: {}", e)))?;

    ::auth::JwtConfig::from_env()?;

    Ok(())
}
