//! Request gate integration tests
//!
//! Drives the full router (rescue, panic catching, gate, handlers) through
//! axum-test with a scripted authorization client.

mod common;

use axum::http::{header, HeaderValue, StatusCode};
use axum::{routing::get, Router};
use axum_test::TestServer;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use webservices::backend::error::ApiError;
use webservices::backend::routes::protect;
use webservices::backend::server::AppState;
use webservices::backend::threescale::{AuthorizationError, Denial};
use webservices::shared::RuntimeMode;

use common::assertions::{assert_content_type, assert_json_error};
use common::{bypass_config, create_test_server, gated_config, ScriptedClient};

#[tokio::test]
async fn test_health_is_never_gated() {
    let client = ScriptedClient::new(Err(Denial::ApiAuthorization.into()));
    let server = create_test_server(gated_config(RuntimeMode::Production), client.clone());

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "ok");
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_bypass_skips_authorization() {
    let client = ScriptedClient::new(Err(Denial::ApiAuthorization.into()));
    let server = create_test_server(bypass_config(RuntimeMode::Production), client.clone());

    let response = server.get("/api/widgets?a=1").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "a": "1", "path": "/api/widgets", "resource": "widgets" })
    );
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_first_call_authorizes_with_service_id() {
    let client = ScriptedClient::authorizing();
    let server = create_test_server(gated_config(RuntimeMode::Production), client.clone());

    let response = server.get("/api/widgets?a=1&b=2").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(client.calls(), 1);

    let request = &client.requests()[0];
    assert_eq!(request.service_id, "svc-test");
    assert_eq!(request.provider_key, "prov-test");
    assert_eq!(request.params.get("a"), Some("1"));
    assert_eq!(request.params.get("b"), Some("2"));
    assert_eq!(request.params.cache_key(), "a1b2path/api/widgets");
}

#[tokio::test]
async fn test_repeated_call_uses_cached_decision() {
    let client = ScriptedClient::authorizing();
    let server = create_test_server(gated_config(RuntimeMode::Production), client.clone());

    let first = server.get("/api/widgets?a=1&b=2").await;
    let second = server.get("/api/widgets?a=1&b=2").await;

    assert_eq!(first.status_code(), StatusCode::OK);
    assert_eq!(second.status_code(), StatusCode::OK);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_parameter_order_is_part_of_the_key() {
    let client = ScriptedClient::authorizing();
    let server = create_test_server(gated_config(RuntimeMode::Production), client.clone());

    server.get("/api/widgets?a=1&b=2").await;
    server.get("/api/widgets?b=2&a=1").await;

    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn test_different_paths_are_authorized_separately() {
    let client = ScriptedClient::authorizing();
    let server = create_test_server(gated_config(RuntimeMode::Production), client.clone());

    server.get("/api/widgets?a=1").await;
    server.get("/api/gadgets?a=1").await;

    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn test_api_key_not_authorized() {
    let client = ScriptedClient::new(Err(Denial::ApiAuthorization.into()));
    let server = create_test_server(gated_config(RuntimeMode::Production), client.clone());

    let response = server.get("/api/widgets?a=1&b=2").await;

    assert_json_error(&response, StatusCode::UNAUTHORIZED, "API key not authorized");
}

#[tokio::test]
async fn test_no_metric_found() {
    let client = ScriptedClient::new(Err(Denial::NoMetricFound.into()));
    let server = create_test_server(gated_config(RuntimeMode::Production), client);

    let response = server.get("/api/widgets").await;

    assert_json_error(&response, StatusCode::UNAUTHORIZED, "3scale metric not found");
}

#[tokio::test]
async fn test_method_usage_exceeded() {
    let client = ScriptedClient::new(Err(Denial::MethodUsageExceeded.into()));
    let server = create_test_server(gated_config(RuntimeMode::Production), client);

    let response = server.get("/api/widgets/7").await;

    assert_json_error(
        &response,
        StatusCode::UNAUTHORIZED,
        "Method usage limit exceeded or no access allowed",
    );
}

#[tokio::test]
async fn test_denials_are_not_cached() {
    let client = ScriptedClient::new(Err(Denial::ApiAuthorization.into()));
    let server = create_test_server(gated_config(RuntimeMode::Production), client.clone());

    server.get("/api/widgets?a=1").await;
    server.get("/api/widgets?a=1").await;

    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn test_unavailable_service_is_redacted_in_production() {
    let client = ScriptedClient::new(Err(AuthorizationError::unavailable("connection refused")));
    let server = create_test_server(gated_config(RuntimeMode::Production), client);

    let response = server.get("/api/widgets").await;

    assert_json_error(
        &response,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Unhandled exception occurred",
    );
}

#[tokio::test]
async fn test_unavailable_service_is_disclosed_in_development() {
    let client = ScriptedClient::new(Err(AuthorizationError::unavailable("connection refused")));
    let server = create_test_server(gated_config(RuntimeMode::Development), client);

    let response = server.get("/api/widgets").await;

    assert_json_error(
        &response,
        StatusCode::INTERNAL_SERVER_ERROR,
        "authorization service unavailable: connection refused",
    );
}

#[tokio::test]
async fn test_denial_rendered_as_xml_from_format_param() {
    let client = ScriptedClient::new(Err(Denial::ApiAuthorization.into()));
    let server = create_test_server(gated_config(RuntimeMode::Production), client);

    let response = server.get("/api/widgets?format=xml").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_content_type(&response, "application/xml");
    let body = response.text();
    assert!(body.starts_with("<?xml"), "unexpected body: {}", body);
    assert!(body.contains("<error>API key not authorized</error>"), "unexpected body: {}", body);
}

#[tokio::test]
async fn test_denial_rendered_as_xml_from_accept_header() {
    let client = ScriptedClient::new(Err(Denial::ApiAuthorization.into()));
    let server = create_test_server(gated_config(RuntimeMode::Production), client);

    let response = server
        .get("/api/widgets")
        .add_header(header::ACCEPT, HeaderValue::from_static("application/xml"))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_content_type(&response, "application/xml");
}

#[tokio::test]
async fn test_html_falls_back_to_json() {
    let client = ScriptedClient::new(Err(Denial::ApiAuthorization.into()));
    let server = create_test_server(gated_config(RuntimeMode::Production), client);

    let response = server
        .get("/api/widgets")
        .add_header(header::ACCEPT, HeaderValue::from_static("text/html"))
        .await;

    assert_json_error(&response, StatusCode::UNAUTHORIZED, "API key not authorized");
}

#[tokio::test]
async fn test_unsupported_format_is_not_acceptable() {
    let client = ScriptedClient::new(Err(Denial::ApiAuthorization.into()));
    let server = create_test_server(gated_config(RuntimeMode::Production), client);

    let response = server.get("/api/widgets?format=yaml").await;

    assert_json_error(
        &response,
        StatusCode::NOT_ACCEPTABLE,
        "Requested format not supported",
    );
}

#[tokio::test]
async fn test_ping_success_body() {
    let client = ScriptedClient::authorizing();
    let server = create_test_server(gated_config(RuntimeMode::Production), client);

    let response = server.get("/api/ping?api_key=k1").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "result": "success" }));
}

#[tokio::test]
async fn test_ping_success_body_as_xml() {
    let client = ScriptedClient::authorizing();
    let server = create_test_server(gated_config(RuntimeMode::Production), client);

    let response = server.get("/api/ping?format=xml").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_content_type(&response, "application/xml");
    assert!(response.text().contains("<result>success</result>"));
}

#[tokio::test]
async fn test_update_echoes_path_params() {
    let client = ScriptedClient::authorizing();
    let server = create_test_server(gated_config(RuntimeMode::Production), client);

    let response = server.put("/api/widgets/42?name=bolt").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "name": "bolt",
            "path": "/api/widgets/42",
            "resource": "widgets",
            "id": "42"
        })
    );
}

#[tokio::test]
async fn test_metric_comes_from_the_route() {
    let client = ScriptedClient::authorizing();
    let server = create_test_server(gated_config(RuntimeMode::Production), client.clone());

    let response = server.get("/api/expensive?api_key=k&metric=hits&path=/api/cheap").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let request = &client.requests()[0];
    assert_eq!(request.params.route_path(), Some("/api/expensive"));
    assert_eq!(request.params.metric(), "expensive");
}

#[tokio::test]
async fn test_echo_rejects_unsupported_format() {
    let server = create_test_server(bypass_config(RuntimeMode::Production), ScriptedClient::authorizing());

    let response = server.get("/api/widgets?format=csv").await;

    assert_json_error(
        &response,
        StatusCode::NOT_ACCEPTABLE,
        "Requested format not supported",
    );
}

#[tokio::test]
async fn test_show_echoes_as_xml() {
    let server = create_test_server(bypass_config(RuntimeMode::Production), ScriptedClient::authorizing());

    let response = server.get("/api/widgets/42?format=xml").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_content_type(&response, "application/xml");
    let body = response.text();
    assert!(body.contains("<id>42</id>"), "unexpected body: {}", body);
    assert!(body.contains("<resource>widgets</resource>"), "unexpected body: {}", body);
}

#[tokio::test]
async fn test_update_form_body_is_authorized_and_echoed() {
    let client = ScriptedClient::authorizing();
    let server = create_test_server(gated_config(RuntimeMode::Production), client.clone());

    let response = server
        .put("/api/widgets/42?api_key=k")
        .form(&[("name", "bolt")])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "api_key": "k",
            "name": "bolt",
            "path": "/api/widgets/42",
            "resource": "widgets",
            "id": "42"
        })
    );
    let request = &client.requests()[0];
    assert_eq!(request.params.cache_key(), "api_keyknameboltpath/api/widgets/42");
}

async fn boom() -> &'static str {
    panic!("kaboom")
}

async fn missing() -> Result<&'static str, ApiError> {
    Err(ApiError::RecordNotFound)
}

fn failing_routes(state: &AppState) -> Router<AppState> {
    let routes = Router::new()
        .route("/api/boom", get(boom))
        .route("/api/missing", get(missing));
    protect(routes, state)
}

fn failing_server(environment: RuntimeMode) -> TestServer {
    let state = AppState::new(bypass_config(environment), ScriptedClient::authorizing());
    let app = failing_routes(&state).with_state(state);
    TestServer::new(app).expect("failed to start test server")
}

#[tokio::test]
async fn test_panic_is_redacted_in_production() {
    let server = failing_server(RuntimeMode::Production);

    let response = server.get("/api/boom").await;

    assert_json_error(
        &response,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Unhandled exception occurred",
    );
}

#[tokio::test]
async fn test_panic_is_disclosed_in_development() {
    let server = failing_server(RuntimeMode::Development);

    let response = server.get("/api/boom").await;

    assert_json_error(&response, StatusCode::INTERNAL_SERVER_ERROR, "kaboom");
}

#[tokio::test]
async fn test_record_not_found() {
    let server = failing_server(RuntimeMode::Production);

    let response = server.get("/api/missing?format=xml").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_content_type(&response, "application/xml");
    assert!(response.text().contains("<error>Record not found</error>"));
}

#[tokio::test]
async fn test_missing_credentials_fail_closed() {
    let mut config = gated_config(RuntimeMode::Production);
    config.provider_key = None;
    let client = ScriptedClient::authorizing();
    let app = webservices::backend::create_app_with_client(config, client.clone());
    let server = TestServer::new(app).expect("failed to start test server");

    let response = server.get("/api/widgets").await;

    assert_json_error(
        &response,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Unhandled exception occurred",
    );
    assert_eq!(client.calls(), 0);
}
