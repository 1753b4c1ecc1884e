/**
 * Request Parameters
 *
 * Builds the ordered parameter list the gate authorizes and caches on: the
 * query string pairs in arrival order, then the pairs of a form or JSON
 * body, followed by the routing parameter `path`.
 *
 * `collect_params` runs ahead of the gate, buffers the body once and leaves
 * the result in the request extensions for the gate and the handlers.
 */

use axum::{
    body::{to_bytes, Body},
    extract::{FromRequestParts, Query, Request},
    http::{header::CONTENT_TYPE, request::Parts, Extensions, HeaderMap, Uri},
    middleware::Next,
    response::Response,
};
use serde_json::Value;

use crate::backend::error::ApiError;
use crate::shared::params::PATH_PARAM;
use crate::shared::RequestParams;

/// Largest request body read for parameters
pub const MAX_BODY_BYTES: usize = 64 * 1024;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Collect the query parameters of a request addressed to `uri`
pub fn request_params(uri: &Uri) -> Result<RequestParams, ApiError> {
    let mut params = RequestParams::from(query_pairs(uri)?);
    params.push(PATH_PARAM, uri.path());
    Ok(params)
}

/// Collect query and body parameters
pub fn request_params_with_body(
    uri: &Uri,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<RequestParams, ApiError> {
    let mut pairs = query_pairs(uri)?;
    pairs.extend(body_params(headers, body)?);

    let mut params = RequestParams::from(pairs);
    params.push(PATH_PARAM, uri.path());
    Ok(params)
}

/// Pairs carried by a form or JSON object body
///
/// Other content types contribute nothing. JSON fields come in key order;
/// non-string values are kept in their JSON text form.
pub fn body_params(headers: &HeaderMap, body: &[u8]) -> Result<Vec<(String, String)>, ApiError> {
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

    match essence.as_str() {
        FORM_CONTENT_TYPE => serde_urlencoded::from_bytes(body).map_err(|e| {
            tracing::warn!("Malformed form body: {}", e);
            ApiError::unhandled(format!("Malformed form body: {}", e))
        }),
        JSON_CONTENT_TYPE => json_params(body),
        _ => Ok(Vec::new()),
    }
}

fn json_params(body: &[u8]) -> Result<Vec<(String, String)>, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!("Malformed JSON body: {}", e);
        ApiError::unhandled(format!("Malformed JSON body: {}", e))
    })?;

    let Value::Object(fields) = value else {
        return Ok(Vec::new());
    };

    Ok(fields
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(text) => (key, text),
            other => (key, other.to_string()),
        })
        .collect())
}

fn query_pairs(uri: &Uri) -> Result<Vec<(String, String)>, ApiError> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri).map_err(|e| {
        tracing::warn!("Malformed query string: {}", e);
        ApiError::unhandled(format!("Malformed query string: {}", e))
    })?;
    Ok(pairs)
}

/// Parameter collection middleware
///
/// Buffers the body (up to [`MAX_BODY_BYTES`]), stores the parameters in the
/// request extensions and hands the request on with the same body.
pub async fn collect_params(request: Request, next: Next) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
        tracing::warn!("Unreadable request body: {}", e);
        ApiError::unhandled(format!("Unreadable request body: {}", e))
    })?;

    let params = request_params_with_body(&parts.uri, &parts.headers, &bytes)?;
    parts.extensions.insert(params);

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

/// Parameters left by [`collect_params`], or the query parameters alone
pub fn params_of(uri: &Uri, extensions: &Extensions) -> Result<RequestParams, ApiError> {
    match extensions.get::<RequestParams>() {
        Some(params) => Ok(params.clone()),
        None => request_params(uri),
    }
}

/// Axum extractor for the request parameters
#[derive(Clone, Debug)]
pub struct ApiParams(pub RequestParams);

impl<S: Send + Sync> FromRequestParts<S> for ApiParams {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        params_of(&parts.uri, &parts.extensions).map(ApiParams)
    }
}
