//! Application configuration module
//!
//! `WebservicesConfig` is built once at startup, either through the builder or
//! from the process environment, and then shared read-only with every request.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default 3scale service management endpoint
pub const DEFAULT_ENDPOINT: &str = "https://su1.3scale.net";

/// How long an authorization decision is reused
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Transport timeout for one authorization call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Request parameter carrying the caller's API key
pub const DEFAULT_API_KEY_PARAM: &str = "api_key";

/// Longest accepted decision cache TTL
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Longest accepted authorization call timeout
pub const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Runtime mode of the hosting application
///
/// Only `Production` redacts the message of unexpected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeMode {
    Development,
    Test,
    #[default]
    Production,
}

impl RuntimeMode {
    /// Whether raw failure messages may be shown to API callers
    pub fn discloses_errors(self) -> bool {
        !matches!(self, RuntimeMode::Production)
    }
}

impl FromStr for RuntimeMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(RuntimeMode::Development),
            "test" => Ok(RuntimeMode::Test),
            "production" | "prod" => Ok(RuntimeMode::Production),
            other => Err(ConfigError::InvalidValue {
                key: ENV_ENVIRONMENT,
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuntimeMode::Development => "development",
            RuntimeMode::Test => "test",
            RuntimeMode::Production => "production",
        };
        f.write_str(name)
    }
}

pub const ENV_BYPASS: &str = "BYPASS_API_AUTHENTICATION";
pub const ENV_SERVICE_ID: &str = "THREESCALE_SERVICE_ID";
pub const ENV_PROVIDER_KEY: &str = "THREESCALE_PROVIDER_KEY";
pub const ENV_ENDPOINT: &str = "THREESCALE_ENDPOINT";
pub const ENV_TIMEOUT: &str = "THREESCALE_TIMEOUT_SECS";
pub const ENV_ENVIRONMENT: &str = "WEBSERVICES_ENV";
pub const ENV_CACHE_TTL: &str = "WEBSERVICES_CACHE_TTL_SECS";
pub const ENV_API_KEY_PARAM: &str = "WEBSERVICES_API_KEY_PARAM";

/// Application configuration
#[derive(Clone)]
pub struct WebservicesConfig {
    /// Skip authorization entirely
    pub bypass_authentication: bool,
    /// 3scale service the API belongs to
    pub service_id: Option<String>,
    /// 3scale provider (account) key
    pub provider_key: Option<String>,
    /// Base URL of the 3scale service management API
    pub endpoint: String,
    pub environment: RuntimeMode,
    pub cache_ttl: Duration,
    pub api_key_param: String,
    pub request_timeout: Duration,
}

impl Default for WebservicesConfig {
    fn default() -> Self {
        Self {
            bypass_authentication: true,
            service_id: None,
            provider_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            environment: RuntimeMode::default(),
            cache_ttl: DEFAULT_CACHE_TTL,
            api_key_param: DEFAULT_API_KEY_PARAM.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

// The provider key is a secret; keep it out of Debug output and logs.
impl fmt::Debug for WebservicesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebservicesConfig")
            .field("bypass_authentication", &self.bypass_authentication)
            .field("service_id", &self.service_id)
            .field("provider_key", &self.provider_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("environment", &self.environment)
            .field("cache_ttl", &self.cache_ttl)
            .field("api_key_param", &self.api_key_param)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl WebservicesConfig {
    /// Create a new WebservicesConfigBuilder
    pub fn builder() -> WebservicesConfigBuilder {
        WebservicesConfigBuilder::default()
    }

    /// Load the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration through an arbitrary variable lookup
    ///
    /// Unset or empty variables fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut builder = Self::builder();

        if let Some(raw) = get(ENV_BYPASS) {
            builder = builder.bypass_authentication(parse_bool(ENV_BYPASS, &raw)?);
        }
        if let Some(service_id) = get(ENV_SERVICE_ID) {
            builder = builder.service_id(service_id);
        }
        if let Some(provider_key) = get(ENV_PROVIDER_KEY) {
            builder = builder.provider_key(provider_key);
        }
        if let Some(endpoint) = get(ENV_ENDPOINT) {
            builder = builder.endpoint(endpoint);
        }
        if let Some(raw) = get(ENV_ENVIRONMENT) {
            builder = builder.environment(raw.parse()?);
        }
        if let Some(raw) = get(ENV_CACHE_TTL) {
            builder = builder.cache_ttl(Duration::from_secs(parse_secs(ENV_CACHE_TTL, &raw)?));
        }
        if let Some(param) = get(ENV_API_KEY_PARAM) {
            builder = builder.api_key_param(param);
        }
        if let Some(raw) = get(ENV_TIMEOUT) {
            builder = builder.request_timeout(Duration::from_secs(parse_secs(ENV_TIMEOUT, &raw)?));
        }

        builder.build()
    }

    /// Validate the configuration
    ///
    /// Credentials are only required when requests are actually authorized.
    /// Durations are bounded so expiry instants never overflow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_ttl > MAX_CACHE_TTL {
            return Err(ConfigError::InvalidValue {
                key: ENV_CACHE_TTL,
                value: self.cache_ttl.as_secs().to_string(),
            });
        }
        if self.request_timeout > MAX_REQUEST_TIMEOUT {
            return Err(ConfigError::InvalidValue {
                key: ENV_TIMEOUT,
                value: self.request_timeout.as_secs().to_string(),
            });
        }
        if self.bypass_authentication {
            return Ok(());
        }
        if self.service_id.is_none() {
            return Err(ConfigError::MissingValue(ENV_SERVICE_ID));
        }
        if self.provider_key.is_none() {
            return Err(ConfigError::MissingValue(ENV_PROVIDER_KEY));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.endpoint.clone()));
        }
        Ok(())
    }
}

/// Builder for WebservicesConfig
#[derive(Debug, Default)]
pub struct WebservicesConfigBuilder {
    config: WebservicesConfig,
}

impl WebservicesConfigBuilder {
    pub fn bypass_authentication(mut self, bypass: bool) -> Self {
        self.config.bypass_authentication = bypass;
        self
    }

    pub fn service_id(mut self, service_id: impl Into<String>) -> Self {
        self.config.service_id = Some(service_id.into());
        self
    }

    pub fn provider_key(mut self, provider_key: impl Into<String>) -> Self {
        self.config.provider_key = Some(provider_key.into());
        self
    }

    /// Set the 3scale endpoint; a trailing slash is dropped
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn environment(mut self, environment: RuntimeMode) -> Self {
        self.config.environment = environment;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    pub fn api_key_param(mut self, param: impl Into<String>) -> Self {
        self.config.api_key_param = param.into();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<WebservicesConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}

fn parse_secs(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_bypass_authentication() {
        let config = WebservicesConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.bypass_authentication);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.environment, RuntimeMode::Production);
        assert_eq!(config.api_key_param, "api_key");
    }

    #[test]
    fn test_full_environment() {
        let config = WebservicesConfig::from_lookup(lookup(&[
            (ENV_BYPASS, "false"),
            (ENV_SERVICE_ID, "svc-1"),
            (ENV_PROVIDER_KEY, "prov-1"),
            (ENV_ENDPOINT, "http://localhost:9000/"),
            (ENV_ENVIRONMENT, "development"),
            (ENV_CACHE_TTL, "60"),
            (ENV_API_KEY_PARAM, "user_key"),
            (ENV_TIMEOUT, "2"),
        ]))
        .unwrap();

        assert!(!config.bypass_authentication);
        assert_eq!(config.service_id.as_deref(), Some("svc-1"));
        assert_eq!(config.provider_key.as_deref(), Some("prov-1"));
        assert_eq!(config.endpoint, "http://localhost:9000");
        assert_eq!(config.environment, RuntimeMode::Development);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.api_key_param, "user_key");
        assert_eq!(config.request_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_credentials_required_when_not_bypassed() {
        let err = WebservicesConfig::from_lookup(lookup(&[(ENV_BYPASS, "no")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingValue(ENV_SERVICE_ID));

        let err = WebservicesConfig::from_lookup(lookup(&[
            (ENV_BYPASS, "0"),
            (ENV_SERVICE_ID, "svc"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingValue(ENV_PROVIDER_KEY));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = WebservicesConfig::from_lookup(lookup(&[(ENV_BYPASS, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: ENV_BYPASS, .. }));

        let err = WebservicesConfig::from_lookup(lookup(&[(ENV_ENVIRONMENT, "staging")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: ENV_ENVIRONMENT, .. }));

        let err = WebservicesConfig::from_lookup(lookup(&[(ENV_CACHE_TTL, "five")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: ENV_CACHE_TTL, .. }));
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let err = WebservicesConfig::builder()
            .bypass_authentication(false)
            .service_id("svc")
            .provider_key("key")
            .endpoint("su1.3scale.net")
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidUrl("su1.3scale.net".to_string()));
    }

    #[test]
    fn test_only_production_redacts() {
        assert!(RuntimeMode::Development.discloses_errors());
        assert!(RuntimeMode::Test.discloses_errors());
        assert!(!RuntimeMode::Production.discloses_errors());
    }

    #[test]
    fn test_debug_redacts_provider_key() {
        let config = WebservicesConfig::builder()
            .provider_key("super-secret")
            .build()
            .unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_oversized_durations_rejected() {
        let result = WebservicesConfig::from_lookup(lookup(&[(
            ENV_CACHE_TTL,
            "18446744073709551615",
        )]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidValue {
                key: ENV_CACHE_TTL,
                value: "18446744073709551615".to_string(),
            }
        );

        let result = WebservicesConfig::builder()
            .request_timeout(Duration::from_secs(u64::MAX))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: ENV_TIMEOUT, .. })
        ));

        let config = WebservicesConfig::builder()
            .cache_ttl(MAX_CACHE_TTL)
            .build()
            .unwrap();
        assert_eq!(config.cache_ttl, MAX_CACHE_TTL);
    }
}
