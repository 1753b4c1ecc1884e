//! Custom assertion macros and utilities
//!
//! Provides assertions on the `{type: message}` response bodies produced by
//! the gate.

use axum::http::StatusCode;
use axum_test::TestResponse;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

/// Assert a JSON `{"error": message}` response with the given status
pub fn assert_json_error(response: &TestResponse, status: StatusCode, message: &str) {
    assert_eq!(response.status_code(), status);
    assert_content_type(response, "application/json");
    assert_eq!(response.json::<Value>(), json!({ "error": message }));
}

/// Assert the response media type, ignoring parameters such as charset
pub fn assert_content_type(response: &TestResponse, expected: &str) {
    let header = response.header("content-type");
    let content_type = header.to_str().expect("content-type is ascii");
    assert!(
        content_type.starts_with(expected),
        "expected content-type {}, got {}",
        expected,
        content_type
    );
}
