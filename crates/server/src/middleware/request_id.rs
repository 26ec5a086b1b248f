//! # Request ID Middleware
//!
//! Assigns every request a correlation ID. An `x-request-id` header is
//! honored when it looks like a CUID2; anything else is replaced with a
//! freshly generated ID. The ID is echoed on the response and attached to
//! the per-request access log line.

use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use logging::{request_id::try_from_header, RequestId};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(try_from_header)
        .unwrap_or_else(RequestId::new);

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    request.extensions_mut().insert(request_id.clone());

    let start = std::time::Instant::now();
    let mut response = next.run(request).await;
    let duration_ms = start.elapsed().as_millis();

    logging::log_api_request!(request_id, method, path, response.status().as_u16(), duration_ms);

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarded_id_is_honored() {
        let id = RequestId::new();
        assert_eq!(try_from_header(id.as_str()), Some(id));
    }

    #[test]
    fn test_malformed_header_is_discarded() {
        assert!(try_from_header("not a cuid").is_none());
        assert!(try_from_header("x").is_none());
    }
}
