/**
 * API Route Configuration
 *
 * Every route in here sits behind the request gate.
 *
 * # Routes
 *
 * - `GET /api/ping` - Success body
 * - `GET /api/{resource}` - Echo params (index)
 * - `GET /api/{resource}/{id}` - Echo params (show)
 * - `PUT /api/{resource}/{id}` - Echo params (update)
 */

use axum::{middleware, routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;

use crate::backend::middleware::{authenticate, collect_params, handle_panic, rescue};
use crate::backend::resources::{index, ping, show, update};
use crate::backend::server::state::AppState;

/// Gated API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/{resource}", get(index))
        .route("/api/{resource}/{id}", get(show).put(update))
}

/// Wrap `router` with parameter collection, the gate, panic catching and
/// error rescue
///
/// Applies to every route already added to `router`. Collection and the gate
/// are route layers, so unmatched paths are not authorized.
pub fn protect(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .route_layer(middleware::from_fn(collect_params))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(state.clone(), rescue))
}

/// Add the gated API routes to `router`
pub fn configure_api_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router.merge(protect(api_routes(), state))
}
