//! # Error Crate Tests
//!
//! Tests for error types, responses, and conversions across the public API.

mod error_response_tests {
    use error::AppError;

    #[test]
    fn test_error_creation() {
        let error = AppError::not_found("Resident not found");
        assert!(matches!(error, AppError::NotFound { .. }));
    }

    #[test]
    fn test_error_display() {
        let error = AppError::bad_request("Invalid period");
        assert_eq!(format!("{}", error), "BadRequest: Invalid period");
    }

    #[test]
    fn test_database_conversion() {
        let db_err = sea_orm::DbErr::Custom("connection lost".to_string());
        let error: AppError = db_err.into();
        assert_eq!(error.code(), "DATABASE_ERROR");
        assert!(error.message().contains("connection lost"));
    }
}

mod api_response_tests {
    use error::ApiResponse;
    use serde_json::json;

    #[test]
    fn test_api_response_ok_with_data() {
        let data = json!({"id": "iur_abc", "status": "paid"});
        let response = ApiResponse::ok(data);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["id"], "iur_abc");
    }

    #[test]
    fn test_api_response_error_envelope() {
        let response = ApiResponse::<serde_json::Value>::error("CONFLICT", "Dues already paid");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "CONFLICT");
    }

    #[test]
    fn test_api_response_paginated_list() {
        let response = ApiResponse::builder()
            .with_data(json!(["a", "b"]))
            .with_pagination(1, 2, 5)
            .build();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["meta"]["pagination"]["total_pages"], 3);
    }
}

mod into_response_tests {
    use axum::response::IntoResponse;
    use error::AppError;
    use rust_decimal::Decimal;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(AppError, axum::http::StatusCode)> = vec![
            (AppError::not_found("x"), axum::http::StatusCode::NOT_FOUND),
            (AppError::bad_request("x"), axum::http::StatusCode::BAD_REQUEST),
            (AppError::unauthorized("x"), axum::http::StatusCode::UNAUTHORIZED),
            (AppError::forbidden("x"), axum::http::StatusCode::FORBIDDEN),
            (AppError::conflict("x"), axum::http::StatusCode::CONFLICT),
            (AppError::validation("x"), axum::http::StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::internal("x"), axum::http::StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::database("x"), axum::http::StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::JwtExpired, axum::http::StatusCode::UNAUTHORIZED),
            (AppError::JwtInvalidSignature, axum::http::StatusCode::UNAUTHORIZED),
            (AppError::JwtInvalidToken, axum::http::StatusCode::UNAUTHORIZED),
            (
                AppError::insufficient_balance(Decimal::new(50_000, 0), Decimal::new(75_000, 0)),
                axum::http::StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected) in cases {
            let code = error.code();
            let response = error.into_response();
            assert_eq!(response.status(), expected, "wrong status for {}", code);
        }
    }

    #[tokio::test]
    async fn test_insufficient_balance_body_carries_details() {
        let error = AppError::insufficient_balance(Decimal::new(100_000, 0), Decimal::new(250_000, 0));
        let response = error.into_response();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["status"], "error");
        assert_eq!(body["code"], "INSUFFICIENT_BALANCE");
        assert_eq!(body["details"]["shortfall"], "150000");
    }

    #[tokio::test]
    async fn test_server_error_body_is_generic() {
        let error = AppError::database("password authentication failed for user rukun");
        let response = error.into_response();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["message"], "Internal server error");
    }
}

mod result_ext_tests {
    use error::{AppError, Result, ResultExt};

    #[test]
    fn test_context_chains() {
        let result: Result<()> = Err(AppError::not_found("Event"));
        let err = result.context("Completing event").unwrap_err();
        assert_eq!(err.message(), "Completing event: Event");
    }

    #[test]
    fn test_context_on_ok_is_noop() {
        let result: Result<i32> = Ok(1);
        assert_eq!(result.context("unused").unwrap(), 1);
    }
}
