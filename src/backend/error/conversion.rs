/**
 * Error Conversion
 *
 * `ApiError` can be returned directly from handlers and middleware. The
 * conversion renders a redacted JSON body and also stores the error itself in
 * the response extensions. The rescue middleware picks it up and renders it
 * again with the negotiated format and the configured runtime mode.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Error message"
 * }
 * ```
 */

use axum::response::{IntoResponse, Response};

use crate::backend::error::translator::translate;
use crate::backend::error::types::ApiError;
use crate::backend::response::{emit, RequestedFormat};
use crate::shared::{ResponseFormat, RuntimeMode};

/// Marker carried by responses built from an `ApiError`
#[derive(Debug, Clone)]
pub struct RaisedError(pub ApiError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Production rendering unless the rescue layer re-renders it.
        let fallback = translate(&self, RuntimeMode::Production);
        let mut response = emit(
            &RequestedFormat(Ok(ResponseFormat::Json)),
            &fallback.body,
            Some(fallback.status),
        );
        response.extensions_mut().insert(RaisedError(self));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_into_response_carries_error() {
        let response = ApiError::MethodUsageExceeded.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let raised = response.extensions().get::<RaisedError>().unwrap();
        assert_eq!(raised.0, ApiError::MethodUsageExceeded);
    }

    #[test]
    fn test_unhandled_fallback_is_redacted() {
        let response = ApiError::unhandled("secret detail").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<RaisedError>().is_some());
    }
}
