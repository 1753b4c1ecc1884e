/**
 * Router Configuration
 *
 * Combines the ungated service routes with the gated API routes.
 *
 * # Routes
 *
 * - `GET /health` - Liveness, never gated
 * - `/api/...` - See `api_routes`
 * - Fallback - 404
 */

use axum::{extract::Request, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/health", get(|| async { "ok" }));

    let router = configure_api_routes(router, &app_state);

    router
        .fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(app_state)
}

/// Access span without the query string, which carries API keys
fn request_span(request: &Request) -> tracing::Span {
    tracing::debug_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}
