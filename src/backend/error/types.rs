/**
 * Backend Error Types
 *
 * # Error Types
 *
 * - `ApiError` - Failures raised while serving an API request. Raised by the
 *   request gate and by application handlers, rendered by the rescue
 *   middleware.
 * - `StartupError` - Failures while assembling the application.
 *
 * # Error Categories
 *
 * ## Authorization Failures
 *
 * Typed refusals from the metering service. They always render with a fixed
 * message regardless of runtime mode:
 * - API key not authorized
 * - Metric not found
 * - Usage limit exceeded
 *
 * ## Uncaught Failures
 *
 * Everything else. The message is only shown outside production.
 */

use thiserror::Error;
use axum::http::StatusCode;

use crate::backend::threescale::{AuthorizationError, Denial};
use crate::shared::{ConfigError, SharedError};

/// Failures surfaced to API callers
///
/// # Usage
///
/// ```rust
/// use webservices::backend::error::ApiError;
///
/// let err = ApiError::unhandled("database offline");
/// assert_eq!(err.to_string(), "database offline");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The API key is invalid or not authorized for the service
    #[error("API key not authorized")]
    ApiKeyNotAuthorized,

    /// No billable metric exists for the requested method
    #[error("3scale metric not found")]
    NoMetricFound,

    /// Usage for the method is exhausted or not granted
    #[error("Method usage limit exceeded or no access allowed")]
    MethodUsageExceeded,

    /// Raised by handlers when the addressed record does not exist
    #[error("Record not found")]
    RecordNotFound,

    /// Anything unexpected
    #[error("{message}")]
    Unhandled {
        /// Underlying failure message; redacted in production
        message: String,
    },
}

impl ApiError {
    /// Wrap an unexpected failure
    pub fn unhandled(message: impl Into<String>) -> Self {
        Self::Unhandled {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - Authorization failures - 401 Unauthorized
    /// - `RecordNotFound` - 404 Not Found
    /// - `Unhandled` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ApiKeyNotAuthorized | Self::NoMetricFound | Self::MethodUsageExceeded => {
                StatusCode::UNAUTHORIZED
            }
            Self::RecordNotFound => StatusCode::NOT_FOUND,
            Self::Unhandled { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Denial> for ApiError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::ApiAuthorization => Self::ApiKeyNotAuthorized,
            Denial::MethodUsageExceeded => Self::MethodUsageExceeded,
            Denial::NoMetricFound => Self::NoMetricFound,
        }
    }
}

impl From<AuthorizationError> for ApiError {
    fn from(err: AuthorizationError) -> Self {
        match err {
            AuthorizationError::Denied(denial) => denial.into(),
            unavailable @ AuthorizationError::Unavailable { .. } => {
                Self::unhandled(unavailable.to_string())
            }
        }
    }
}

impl From<SharedError> for ApiError {
    fn from(err: SharedError) -> Self {
        Self::unhandled(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::unhandled(format!("Serialization error: {}", err))
    }
}

/// Failures while building the application
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
