/**
 * Application State Management
 *
 * `AppState` is the central state container shared by every request:
 * - The configuration, built once at startup and read-only afterwards
 * - The authorization client
 * - The decision cache
 *
 * # Thread Safety
 *
 * - `Arc<WebservicesConfig>` for shared read-only configuration
 * - `Arc<dyn AuthorizationClient>` so tests can substitute the client
 * - `DecisionCache` carries its own `Arc<RwLock<..>>`
 *
 * # State Extraction
 *
 * The `FromRef` implementation lets the rescue middleware extract only the
 * configuration.
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::cache::DecisionCache;
use crate::backend::threescale::{AuthorizationClient, Authorized};
use crate::shared::WebservicesConfig;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<WebservicesConfig>,
    pub client: Arc<dyn AuthorizationClient>,
    pub decisions: DecisionCache<Authorized>,
}

impl AppState {
    pub fn new(config: WebservicesConfig, client: Arc<dyn AuthorizationClient>) -> Self {
        Self {
            config: Arc::new(config),
            client,
            decisions: DecisionCache::new(),
        }
    }
}

impl FromRef<AppState> for Arc<WebservicesConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
