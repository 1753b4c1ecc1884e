/**
 * Request Gate
 *
 * Authorizes every API request against the metering service before it
 * reaches a handler.
 *
 * # Flow
 *
 * 1. Bypass configured: the request proceeds untouched.
 * 2. Otherwise the ordered request parameters are flattened into a cache key.
 * 3. An unexpired cached verdict for that key is reused.
 * 4. On a miss the authorization client is called and a successful verdict is
 *    cached. Failures are returned as `ApiError`, never cached and never
 *    retried.
 */

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::middleware::params::params_of;
use crate::backend::server::state::AppState;
use crate::backend::threescale::{AuthorizationRequest, Authorized};
use crate::shared::RequestParams;

/// Gate middleware
///
/// On success the `Authorized` verdict is attached to the request extensions
/// for handlers to read through [`Authorization`].
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.config.bypass_authentication {
        return Ok(next.run(request).await);
    }

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("authenticate", %request_id, path = %request.uri().path());

    let params = params_of(request.uri(), request.extensions())?;
    let authorized = authorize(&state, params).instrument(span).await?;

    request.extensions_mut().insert(authorized);
    Ok(next.run(request).await)
}

/// Cached authorization of one parameter set
pub async fn authorize(state: &AppState, params: RequestParams) -> Result<Authorized, ApiError> {
    let config = &state.config;
    let (Some(service_id), Some(provider_key)) = (&config.service_id, &config.provider_key) else {
        tracing::error!("Authorization is enabled but 3scale credentials are not configured");
        return Err(ApiError::unhandled("3scale credentials are not configured"));
    };

    let cache_key = params.cache_key();
    let authorization_request = AuthorizationRequest {
        params,
        service_id: service_id.clone(),
        provider_key: provider_key.clone(),
    };

    state
        .decisions
        .get_or_compute(&cache_key, config.cache_ttl, || async {
            state.client.authorize(&authorization_request).await
        })
        .await
        .map_err(|e| {
            tracing::warn!("Request not authorized: {}", e);
            ApiError::from(e)
        })
}

/// Axum extractor for the verdict attached by the gate
///
/// `None` when authorization is bypassed.
#[derive(Clone, Debug)]
pub struct Authorization(pub Option<Authorized>);

impl<S: Send + Sync> FromRequestParts<S> for Authorization {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Authorization(parts.extensions.get::<Authorized>().cloned()))
    }
}
