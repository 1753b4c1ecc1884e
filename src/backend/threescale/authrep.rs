/**
 * 3scale Authrep Client
 *
 * Authorizes and reports one hit in a single call:
 *
 * ```text
 * GET {endpoint}/transactions/authrep.xml
 *     ?provider_key=..&service_id=..&user_key=..&usage[<metric>]=1
 * ```
 *
 * # Response Mapping
 *
 * - `<status>` with `<authorized>true</authorized>` - authorized
 * - `<status>` with `<authorized>false</authorized>` - usage exceeded
 * - `<error code="metric_invalid">` - no metric found
 * - `<error code="user_key_invalid">` and friends - API key not authorized
 * - anything else - service unavailable
 */

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::backend::threescale::client::{
    AuthorizationClient, AuthorizationError, AuthorizationRequest, Authorized, Denial, Verdict,
};
use crate::shared::WebservicesConfig;

const AUTHREP_PATH: &str = "/transactions/authrep.xml";

/// Error codes meaning the key (or the service it targets) is not valid
const KEY_ERROR_CODES: &[&str] = &[
    "user_key_invalid",
    "user_key_missing",
    "provider_key_invalid",
    "application_not_found",
    "application_key_invalid",
    "service_id_invalid",
];

const METRIC_ERROR_CODE: &str = "metric_invalid";

#[derive(Debug, Deserialize)]
struct AuthrepStatus {
    authorized: bool,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    plan: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthrepError {
    #[serde(rename = "@code")]
    code: String,
    #[serde(rename = "$text", default)]
    message: String,
}

/// HTTP client for the 3scale service management API
#[derive(Debug, Clone)]
pub struct ThreeScaleClient {
    http: Client,
    endpoint: String,
    api_key_param: String,
}

impl ThreeScaleClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key_param: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key_param: api_key_param.into(),
        })
    }

    pub fn from_config(config: &WebservicesConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.endpoint.clone(),
            config.api_key_param.clone(),
            config.request_timeout,
        )
    }
}

#[async_trait]
impl AuthorizationClient for ThreeScaleClient {
    async fn authorize(&self, request: &AuthorizationRequest) -> Verdict {
        let user_key = request
            .params
            .get(&self.api_key_param)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                tracing::warn!(param = %self.api_key_param, "request carries no API key");
                Denial::ApiAuthorization
            })?;
        let metric = request.params.metric();
        let usage_param = format!("usage[{}]", metric);

        tracing::debug!(service_id = %request.service_id, metric = %metric, "calling 3scale authrep");

        let response = self
            .http
            .get(format!("{}{}", self.endpoint, AUTHREP_PATH))
            .query(&[
                ("provider_key", request.provider_key.as_str()),
                ("service_id", request.service_id.as_str()),
                ("user_key", user_key),
                (usage_param.as_str(), "1"),
            ])
            .send()
            .await
            .map_err(|e| {
                // the request URL carries both keys
                let e = e.without_url();
                tracing::error!("3scale request failed: {}", e);
                AuthorizationError::unavailable(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthorizationError::unavailable(e.without_url().to_string()))?;

        interpret(status, &body)
    }
}

/// Map an authrep response onto a verdict
fn interpret(status: StatusCode, body: &str) -> Verdict {
    if let Ok(report) = quick_xml::de::from_str::<AuthrepStatus>(body) {
        if report.authorized {
            return Ok(Authorized { plan: report.plan });
        }
        tracing::warn!(reason = ?report.reason, "3scale refused the request");
        return Err(Denial::MethodUsageExceeded.into());
    }

    if let Ok(error) = quick_xml::de::from_str::<AuthrepError>(body) {
        tracing::warn!(code = %error.code, message = %error.message, "3scale returned an error");
        if error.code == METRIC_ERROR_CODE {
            return Err(Denial::NoMetricFound.into());
        }
        if KEY_ERROR_CODES.contains(&error.code.as_str()) {
            return Err(Denial::ApiAuthorization.into());
        }
        return Err(AuthorizationError::unavailable(format!(
            "3scale error {}: {}",
            error.code, error.message
        )));
    }

    Err(AuthorizationError::unavailable(format!(
        "unexpected 3scale response ({})",
        status
    )))
}
