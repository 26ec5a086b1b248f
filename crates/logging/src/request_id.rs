//! # Request ID Tracking
//!
//! Utilities for generating and propagating request IDs across the backend.
//! Uses CUID2 for collision-resistant, URL-safe identifiers.

use cuid2::CuidConstructor;

/// A request ID type using CUID2.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random request ID using CUID2.
    #[inline]
    pub fn new() -> Self { Self(CuidConstructor::new().with_length(24).create_id()) }

    /// Get the request ID as a string.
    #[inline]
    pub fn as_str(&self) -> &str { &self.0 }

    /// Consume and return the inner string.
    #[inline]
    pub fn into_string(self) -> String { self.0 }
}

impl Default for RequestId {
    #[inline]
    fn default() -> Self { Self::new() }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// Try to parse a request ID from an incoming header value.
///
/// Accepts CUID2-shaped values only; anything else gets replaced with a
/// freshly generated ID by the caller.
pub fn try_from_header(value: &str) -> Option<RequestId> {
    let value = value.trim();
    if (20..=32).contains(&value.len()) && value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(RequestId(value.to_string()))
    }
    else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_length() {
        let id = RequestId::new();
        assert_eq!(id.as_str().len(), 24);
    }

    #[test]
    fn test_request_id_uniqueness() {
        assert_ne!(RequestId::new(), RequestId::new());
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::new();
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_try_from_header() {
        let cuid = "k192v2g4w3zq8h6j5k123456";
        let result = try_from_header(cuid);
        assert!(result.is_some());
        assert_eq!(result.unwrap().as_str(), cuid);
    }

    #[test]
    fn test_try_from_header_invalid() {
        assert!(try_from_header("short").is_none());
        assert!(try_from_header("invalid!@#characters-here-xx").is_none());
        assert!(try_from_header(&"x".repeat(64)).is_none());
    }
}
