/**
 * Response Emitter
 *
 * Serializes a `{type: message}` body in the negotiated representation.
 * JSON and HTML callers get JSON, XML callers get an XML document. A request
 * for a format we cannot produce gets 406 with a JSON body.
 *
 * `emit_value` applies the same rules to flat documents other than the
 * single-key body, such as echoed request parameters.
 */

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};

use serde::Serialize;

use crate::backend::response::negotiate::{NotAcceptable, RequestedFormat};
use crate::shared::error::SharedError;
use crate::shared::response::render_document;
use crate::shared::{ResponseBody, ResponseFormat};

pub const NOT_ACCEPTABLE_MESSAGE: &str = "Requested format not supported";

/// Serialize `body` for `format`; status defaults to 200
pub fn emit(format: &RequestedFormat, body: &ResponseBody, status: Option<StatusCode>) -> Response {
    let status = status.unwrap_or(StatusCode::OK);
    match &format.0 {
        Ok(format) => render(*format, body.render(*format), status),
        Err(requested) => not_acceptable(requested),
    }
}

/// Serialize a flat `document` such as a parameter map for `format`
///
/// Follows the same negotiation rules as [`emit`], including the 406 for
/// unsupported formats.
pub fn emit_value<T: Serialize + ?Sized>(
    format: &RequestedFormat,
    document: &T,
    status: Option<StatusCode>,
) -> Response {
    let status = status.unwrap_or(StatusCode::OK);
    match &format.0 {
        Ok(format) => render(*format, render_document(document, *format), status),
        Err(requested) => not_acceptable(requested),
    }
}

fn not_acceptable(requested: &NotAcceptable) -> Response {
    tracing::debug!(requested = %requested.requested, "no acceptable response format");
    render(
        ResponseFormat::Json,
        ResponseBody::error(NOT_ACCEPTABLE_MESSAGE).render(ResponseFormat::Json),
        StatusCode::NOT_ACCEPTABLE,
    )
}

/// `{"result": "success"}` with 200
pub fn show_success(format: &RequestedFormat) -> Response {
    emit(format, &ResponseBody::success(), Some(StatusCode::OK))
}

/// `{"error": message}` with `status`
pub fn show_error(format: &RequestedFormat, message: impl Into<String>, status: StatusCode) -> Response {
    emit(format, &ResponseBody::error(message), Some(status))
}

fn render(format: ResponseFormat, text: Result<String, SharedError>, status: StatusCode) -> Response {
    match text {
        Ok(text) => (status, [(CONTENT_TYPE, format.content_type())], text).into_response(),
        Err(e) => {
            tracing::error!("failed to serialize response body: {}", e);
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::from("Internal Server Error"))
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}
