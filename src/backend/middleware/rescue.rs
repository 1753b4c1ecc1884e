/**
 * Error Rescue Middleware
 *
 * The outermost layer of the API routes. Any response raised from an
 * `ApiError` below it (gate refusals, handler errors, caught panics) is
 * re-rendered here with the caller's negotiated format and the configured
 * runtime mode. Responses that did not come from an error pass through.
 */

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::backend::error::{translate, ApiError, RaisedError};
use crate::backend::response::{emit, RequestedFormat};
use crate::shared::WebservicesConfig;

/// Rescue middleware
pub async fn rescue(
    State(config): State<Arc<WebservicesConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let format = RequestedFormat::from_parts(request.uri(), request.headers());
    let response = next.run(request).await;

    let Some(RaisedError(error)) = response.extensions().get::<RaisedError>().cloned() else {
        return response;
    };

    if let ApiError::Unhandled { message } = &error {
        tracing::error!(environment = %config.environment, "Unhandled error: {}", message);
    }

    let translated = translate(&error, config.environment);
    emit(&format, &translated.body, Some(translated.status))
}

/// Turn a handler panic into an unhandled `ApiError`
///
/// Used with `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    ApiError::unhandled(message).into_response()
}
