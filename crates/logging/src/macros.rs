//! # Logging Macros
//!
//! Convenience macros for the structured log lines emitted on every request,
//! login, and notification dispatch.

/// Log an API request with its correlation ID, method, path, and outcome.
#[macro_export]
macro_rules! log_api_request {
    ($request_id:expr, $method:expr, $path:expr, $status:expr, $duration_ms:expr) => {
        tracing::info!(
            target: "api",
            request_id = %$request_id,
            method = %$method,
            path = %$path,
            status = %$status,
            duration_ms = %$duration_ms,
            "API request"
        )
    };
}

/// Log an authentication event (login, token rejection).
#[macro_export]
macro_rules! log_auth_event {
    ($event:expr, $user_id:expr, $success:expr) => {
        tracing::info!(
            target: "auth",
            event = %$event,
            user_id = %$user_id,
            success = $success,
            "Authentication event"
        )
    };
}

/// Log a push-notification dispatch.
#[macro_export]
macro_rules! log_notification {
    ($kind:expr, $user_id:expr, $delivered:expr) => {
        tracing::info!(
            target: "notify",
            kind = %$kind,
            user_id = %$user_id,
            delivered = $delivered,
            "Notification dispatched"
        )
    };
}
