/**
 * Authorization Client Contract
 *
 * The request gate only depends on this trait. One call per authorization
 * attempt; the result is either `Authorized` or a typed failure.
 */

use async_trait::async_trait;
use thiserror::Error;

use crate::shared::RequestParams;

/// Everything needed to authorize one inbound request
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub params: RequestParams,
    pub service_id: String,
    pub provider_key: String,
}

/// Successful verdict
///
/// Cached by the gate and exposed to handlers through request extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Authorized {
    /// Plan name reported by the metering service, if any
    pub plan: Option<String>,
}

/// The three ways the metering service refuses a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Denial {
    /// API key missing, invalid, or not valid for the service
    #[error("API key not authorized")]
    ApiAuthorization,
    /// Usage limits exceeded, or no access to the metric on this plan
    #[error("method usage exceeded")]
    MethodUsageExceeded,
    /// The requested method has no billable metric
    #[error("no metric found")]
    NoMetricFound,
}

/// Failure of an authorization attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error(transparent)]
    Denied(#[from] Denial),

    /// Transport or protocol failure talking to the metering service
    #[error("authorization service unavailable: {message}")]
    Unavailable { message: String },
}

impl AuthorizationError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Outcome of one authorization attempt
pub type Verdict = Result<Authorized, AuthorizationError>;

/// Remote authorization/metering service
#[async_trait]
pub trait AuthorizationClient: Send + Sync {
    async fn authorize(&self, request: &AuthorizationRequest) -> Verdict;
}
