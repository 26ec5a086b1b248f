//! # API Response Types
//!
//! Generic API response types for the Rukun backend.
//! Provides a consistent response format for all endpoints.
//!
//! ## Response Format
//!
//! ```json
//! {
//!   "status": "success",
//!   "data": { ... }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// API response metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ResponseMeta {
    /// Request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// Pagination metadata for list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationMeta>,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PaginationMeta {
    /// Current page number (1-indexed).
    pub page: u64,

    /// Number of items per page.
    pub per_page: u64,

    /// Total number of items.
    pub total_items: u64,

    /// Total number of pages.
    pub total_pages: u64,
}

impl PaginationMeta {
    /// Page numbers beyond this are clamped; offsets stay within u64.
    const MAX_PAGE: u64 = 1_000_000;

    /// Create pagination meta. `page` is clamped to `1..=MAX_PAGE` and
    /// `per_page` to at least 1.
    pub fn new(page: u64, per_page: u64, total_items: u64) -> Self {
        let page = page.clamp(1, Self::MAX_PAGE);
        let per_page = per_page.max(1);
        let total_pages = total_items.div_ceil(per_page);
        Self {
            page,
            per_page,
            total_items,
            total_pages,
        }
    }

    /// Offset for database queries.
    pub fn offset(&self) -> u64 { (self.page - 1) * self.per_page }

    /// Limit for database queries.
    pub fn limit(&self) -> u64 { self.per_page }

    /// Whether a page follows this one.
    pub fn has_next(&self) -> bool { self.page < self.total_pages }
}

/// API response type.
///
/// The generic response envelope used by all endpoints: a status tag, then
/// either data or an error code, message, and optional details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ApiResponse<T> {
    /// Success response.
    Success {
        /// Response data.
        data: T,

        /// Response metadata.
        #[serde(skip_serializing_if = "Option::is_none")]
        meta: Option<ResponseMeta>,
    },

    /// Error response.
    Error {
        /// Error code.
        code: String,

        /// Error message.
        message: String,

        /// Error details.
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<serde_json::Value>,

        /// Request ID for correlation.
        #[serde(skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
    },
}

/// Builder for API responses.
#[derive(Debug, Clone)]
pub struct ApiResponseBuilder<T> {
    data:  Option<T>,
    error: Option<(String, String, Option<serde_json::Value>)>,
    meta:  ResponseMeta,
}

impl<T: Default> ApiResponseBuilder<T> {
    /// Create a new builder.
    #[inline]
    pub fn new() -> Self {
        Self {
            data:  None,
            error: None,
            meta:  ResponseMeta::default(),
        }
    }

    /// Set the response data.
    #[inline]
    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    /// Set an error response.
    #[inline]
    pub fn with_error(mut self, code: impl ToString, message: impl ToString) -> Self {
        self.error = Some((code.to_string(), message.to_string(), None));
        self
    }

    /// Set an error with details.
    #[inline]
    pub fn with_error_details(
        mut self,
        code: impl ToString,
        message: impl ToString,
        details: serde_json::Value,
    ) -> Self {
        self.error = Some((code.to_string(), message.to_string(), Some(details)));
        self
    }

    /// Set the request ID.
    #[inline]
    pub fn with_request_id(mut self, request_id: impl ToString) -> Self {
        self.meta.request_id = Some(request_id.to_string());
        self
    }

    /// Set pagination metadata.
    #[inline]
    pub fn with_pagination(mut self, page: u64, per_page: u64, total_items: u64) -> Self {
        self.meta.pagination = Some(PaginationMeta::new(page, per_page, total_items));
        self
    }

    /// Build the response.
    #[inline]
    pub fn build(self) -> ApiResponse<T> {
        if let Some((code, message, details)) = self.error {
            return ApiResponse::Error {
                code,
                message,
                details,
                request_id: self.meta.request_id,
            };
        }

        let meta = if self.meta == ResponseMeta::default() {
            None
        }
        else {
            Some(self.meta)
        };

        ApiResponse::Success {
            data: self.data.unwrap_or_default(),
            meta,
        }
    }
}

impl<T: Default> Default for ApiResponseBuilder<T> {
    fn default() -> Self { Self::new() }
}

impl<T: Default> ApiResponse<T> {
    /// Create a success response with data.
    #[inline]
    pub fn ok(data: T) -> Self {
        ApiResponse::Success {
            data,
            meta: None,
        }
    }

    /// Create a success response builder.
    #[inline]
    pub fn builder() -> ApiResponseBuilder<T> { ApiResponseBuilder::new() }

    /// Create an error response.
    #[inline]
    pub fn error(code: impl ToString, message: impl ToString) -> Self {
        ApiResponse::Error {
            code:       code.to_string(),
            message:    message.to_string(),
            details:    None,
            request_id: None,
        }
    }

    /// Get a reference to the data if this is a success response.
    #[inline]
    pub fn data(&self) -> Option<&T> {
        match self {
            ApiResponse::Success {
                data, ..
            } => Some(data),
            ApiResponse::Error {
                ..
            } => None,
        }
    }

    /// Check if this is a success response.
    #[inline]
    pub fn is_success(&self) -> bool { matches!(self, ApiResponse::Success { .. }) }

    /// Check if this is an error response.
    #[inline]
    pub fn is_error(&self) -> bool { matches!(self, ApiResponse::Error { .. }) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_ok() {
        let response = ApiResponse::ok("paid");
        assert!(response.is_success());
        assert_eq!(response.data(), Some(&"paid"));
    }

    #[test]
    fn test_response_error() {
        let response: ApiResponse<()> = ApiResponse::error("NOT_FOUND", "Dues record not found");
        match response {
            ApiResponse::Error {
                code,
                message,
                details,
                ..
            } => {
                assert_eq!(code, "NOT_FOUND");
                assert_eq!(message, "Dues record not found");
                assert!(details.is_none());
            },
            _ => panic!("Expected error response"),
        }
    }

    #[test]
    fn test_response_serialization() {
        let response = ApiResponse::ok("test");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"success\""));
        assert!(json.contains("\"data\":\"test\""));
    }

    #[test]
    fn test_response_error_serialization() {
        let response: ApiResponse<()> = ApiResponse::error("FORBIDDEN", "Not allowed");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"error\""));
        assert!(json.contains("\"code\":\"FORBIDDEN\""));
        assert!(!json.contains("details"), "absent details should be omitted");
    }

    #[test]
    fn test_response_builder_with_pagination() {
        let response = ApiResponse::builder()
            .with_data(vec!["warga1", "warga2"])
            .with_request_id("req-123")
            .with_pagination(2, 20, 45)
            .build();

        match response {
            ApiResponse::Success {
                data,
                meta,
            } => {
                assert_eq!(data.len(), 2);
                let meta = meta.expect("meta should be present");
                assert_eq!(meta.request_id.as_deref(), Some("req-123"));
                let p = meta.pagination.expect("pagination should be present");
                assert_eq!(p.total_pages, 3);
                assert!(p.has_next());
            },
            _ => panic!("Expected success response"),
        }
    }

    #[test]
    fn test_response_builder_error_path() {
        let response: ApiResponse<()> = ApiResponse::builder()
            .with_error_details(
                "VALIDATION",
                "Validation failed",
                serde_json::json!({"period": "expected MM-YYYY"}),
            )
            .with_request_id("req-456")
            .build();

        match response {
            ApiResponse::Error {
                code,
                details,
                request_id,
                ..
            } => {
                assert_eq!(code, "VALIDATION");
                assert!(details.unwrap().get("period").is_some());
                assert_eq!(request_id, Some("req-456".to_string()));
            },
            _ => panic!("Expected error response"),
        }
    }

    #[test]
    fn test_plain_ok_omits_meta() {
        let json = serde_json::to_string(&ApiResponse::ok(1)).unwrap();
        assert!(!json.contains("meta"));
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 10, 100);
        assert_eq!(meta.total_pages, 10);
        assert_eq!(meta.offset(), 0);
        assert!(meta.has_next());

        let last = PaginationMeta::new(10, 10, 100);
        assert_eq!(last.offset(), 90);
        assert!(!last.has_next());
    }

    #[test]
    fn test_pagination_clamping() {
        let meta = PaginationMeta::new(0, 10, 100);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.offset(), 0);

        let meta = PaginationMeta::new(u64::MAX, 10, 100);
        assert_eq!(meta.page, PaginationMeta::MAX_PAGE);

        // per_page 0 must not divide by zero
        let meta = PaginationMeta::new(1, 0, 100);
        assert_eq!(meta.per_page, 1);
        assert_eq!(meta.total_pages, 100);
    }

    #[test]
    fn test_pagination_empty_list() {
        let meta = PaginationMeta::new(1, 20, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next());
    }
}
