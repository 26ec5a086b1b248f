//! # Error Handling Middleware
//!
//! Converts [`AppError`] values into HTTP responses with the standard API
//! envelope. Handlers return `Result<Json<T>, AppError>` and the
//! `IntoResponse` impl below does the rest.

use axum::{body::Body, http::StatusCode, response::Response};

use crate::{response::ApiResponse, AppError};

/// Error handler that converts errors to HTTP responses.
#[derive(Clone)]
pub struct ErrorHandler {
    /// Whether to include internal error messages in the response body.
    pub include_details: bool,
}

impl ErrorHandler {
    /// Create a new error handler.
    #[inline]
    pub fn new(include_details: bool) -> Self {
        Self {
            include_details,
        }
    }

    /// Convert an error to a response.
    ///
    /// Client errors (4xx) always carry their real message; server errors
    /// only do when `include_details` is set, so internals stay out of
    /// production responses.
    pub fn to_response(&self, err: &AppError) -> Response {
        let status = err.status();
        let code = err.code();

        let message = if self.include_details || !status.is_server_error() {
            err.message()
        }
        else {
            "Internal server error".to_string()
        };

        let response = match err.details() {
            Some(details) => {
                ApiResponse::<()>::builder()
                    .with_error_details(code, message, details)
                    .build()
            },
            None => ApiResponse::<()>::error(code, message),
        };

        let body = serde_json::to_string(&response)
            .unwrap_or_else(|_| r#"{"status":"error","code":"INTERNAL_ERROR","message":"Internal server error"}"#.to_string());

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap_or_default()
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Request failed");
        }
        ErrorHandler::new(false).to_response(&self)
    }
}
