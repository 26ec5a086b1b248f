//! # Error Traits
//!
//! Conversion traits for error handling.

use crate::{AppError, Result};

/// Extension methods for Result types.
pub trait ResultExt<T> {
    /// Prefix the error message with context.
    fn context<C: ToString>(self, context: C) -> Result<T>;

    /// Log the error at error level and pass it through.
    fn log_error(self) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn context<C: ToString>(self, context: C) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            err.context(context)
        })
    }

    fn log_error(self) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            tracing::error!(error = %err, "Error occurred");
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context() {
        let result: Result<i32> = Err(AppError::not_found("Resident"));
        let err = result.context("Generating dues").unwrap_err();

        assert_eq!(err.message(), "Generating dues: Resident");
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn test_context_on_foreign_error() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing proof image",
        ));
        let err = result.context("Deleting proof").unwrap_err();

        assert_eq!(err.code(), "IO_ERROR");
        assert!(err.message().contains("Deleting proof"));
    }

    #[test]
    fn test_log_error_passes_through() {
        let result: Result<i32> = Err(AppError::conflict("Period already generated"));
        assert!(result.log_error().is_err());

        let result: Result<i32> = Ok(7);
        assert_eq!(result.log_error().unwrap(), 7);
    }
}
