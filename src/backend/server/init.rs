/**
 * Server Initialization
 *
 * Builds the application state and router from a validated configuration.
 *
 * # Initialization Process
 *
 * 1. Create the 3scale client (HTTP connection pool with request timeout)
 * 2. Create the application state with an empty decision cache
 * 3. Create and configure the router
 */

use axum::Router;
use std::sync::Arc;

use crate::backend::error::StartupError;
use crate::backend::routes::router::create_router;
use crate::backend::server::state::AppState;
use crate::backend::threescale::{AuthorizationClient, ThreeScaleClient};
use crate::shared::WebservicesConfig;

/// Create and configure the Axum application backed by 3scale
///
/// # Errors
///
/// Fails when the configuration is invalid or the HTTP client cannot be
/// built (e.g. TLS backend initialization).
pub fn create_app(config: WebservicesConfig) -> Result<Router<()>, StartupError> {
    config.validate()?;
    let client = ThreeScaleClient::from_config(&config)?;
    Ok(create_app_with_client(config, Arc::new(client)))
}

/// Create the application with an explicit authorization client
///
/// Used by tests and by deployments that authorize against something other
/// than 3scale.
pub fn create_app_with_client(
    config: WebservicesConfig,
    client: Arc<dyn AuthorizationClient>,
) -> Router<()> {
    tracing::info!("Initializing webservices backend");

    let app_state = AppState::new(config, client);
    let app = create_router(app_state);

    tracing::info!("Router configured");

    app
}
