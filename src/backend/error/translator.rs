/**
 * Error Translator
 *
 * Turns an `ApiError` into the `{"error": message}` body and status code the
 * caller sees.
 *
 * | Failure                | Message                                            | Status |
 * |------------------------|----------------------------------------------------|--------|
 * | API key not authorized | "API key not authorized"                           | 401    |
 * | Metric not found       | "3scale metric not found"                          | 401    |
 * | Usage exceeded         | "Method usage limit exceeded or no access allowed" | 401    |
 * | Record not found       | "Record not found"                                 | 404    |
 * | Anything else          | raw message / "Unhandled exception occurred"       | 500    |
 *
 * The raw message of an unexpected failure is only disclosed outside
 * production. Typed failures never depend on the mode.
 */

use axum::http::StatusCode;

use crate::backend::error::types::ApiError;
use crate::shared::{ResponseBody, RuntimeMode};

/// Message shown in production instead of an unexpected failure's own
pub const REDACTED_MESSAGE: &str = "Unhandled exception occurred";

/// Body and status for a failed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub body: ResponseBody,
    pub status: StatusCode,
}

impl ErrorResponse {
    /// `show_error`: an `error` body with `status`
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            body: ResponseBody::error(message),
            status,
        }
    }
}

/// Translate `error` for a server running in `mode`
pub fn translate(error: &ApiError, mode: RuntimeMode) -> ErrorResponse {
    let status = error.status_code();
    match error {
        ApiError::ApiKeyNotAuthorized
        | ApiError::NoMetricFound
        | ApiError::MethodUsageExceeded
        | ApiError::RecordNotFound => ErrorResponse::new(error.to_string(), status),
        ApiError::Unhandled { message } if mode.discloses_errors() => {
            ErrorResponse::new(message.clone(), status)
        }
        ApiError::Unhandled { .. } => ErrorResponse::new(REDACTED_MESSAGE, status),
    }
}
