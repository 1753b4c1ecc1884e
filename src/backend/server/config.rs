/**
 * Server Configuration
 *
 * Loads `WebservicesConfig` from the process environment (and `.env` when
 * present) and logs the effective settings. The provider key never reaches
 * the log.
 *
 * # Error Handling
 *
 * Unlike optional services, a bad gate configuration is fatal: the server
 * refuses to start rather than serve requests with a half-configured gate.
 */

use crate::shared::{ConfigError, WebservicesConfig};

/// Load and validate the gate configuration
///
/// # Example
///
/// ```rust,no_run
/// use webservices::backend::server::config::load_config;
///
/// let config = load_config().expect("invalid configuration");
/// assert!(config.cache_ttl.as_secs() > 0);
/// ```
pub fn load_config() -> Result<WebservicesConfig, ConfigError> {
    dotenv::dotenv().ok();

    let config = WebservicesConfig::from_env().map_err(|e| {
        tracing::error!("Invalid webservices configuration: {}", e);
        e
    })?;

    if config.bypass_authentication {
        tracing::warn!("API authentication is bypassed. Every request will be admitted.");
    } else {
        tracing::info!(
            service_id = config.service_id.as_deref().unwrap_or_default(),
            endpoint = %config.endpoint,
            "API authentication enabled"
        );
    }

    tracing::info!(
        environment = %config.environment,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        api_key_param = %config.api_key_param,
        "Webservices configuration loaded"
    );

    Ok(config)
}
