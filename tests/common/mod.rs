//! Common test utilities and helpers
//!
//! This module provides shared utilities for the integration tests:
//! - A scripted authorization client that counts calls
//! - Configuration and test server fixtures
//! - Response assertions

#![allow(dead_code)]

pub mod assertions;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use webservices::backend::create_app_with_client;
use webservices::backend::threescale::{
    AuthorizationClient, AuthorizationRequest, Authorized, Verdict,
};
use webservices::shared::{RuntimeMode, WebservicesConfig};


/// Authorization client returning a fixed verdict
///
/// Records every request it receives so tests can assert on call counts and
/// the parameters that reached the metering service.
pub struct ScriptedClient {
    verdict: Verdict,
    requests: Mutex<Vec<AuthorizationRequest>>,
}

impl ScriptedClient {
    pub fn new(verdict: Verdict) -> Arc<Self> {
        Arc::new(Self {
            verdict,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn authorizing() -> Arc<Self> {
        Self::new(Ok(Authorized {
            plan: Some("Basic".to_string()),
        }))
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<AuthorizationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthorizationClient for ScriptedClient {
    async fn authorize(&self, request: &AuthorizationRequest) -> Verdict {
        self.requests.lock().unwrap().push(request.clone());
        self.verdict.clone()
    }
}

/// Configuration with the gate enabled and test credentials
pub fn gated_config(environment: RuntimeMode) -> WebservicesConfig {
    WebservicesConfig::builder()
        .bypass_authentication(false)
        .service_id("svc-test")
        .provider_key("prov-test")
        .environment(environment)
        .build()
        .expect("test configuration is valid")
}

/// Configuration with the gate bypassed
pub fn bypass_config(environment: RuntimeMode) -> WebservicesConfig {
    WebservicesConfig::builder()
        .bypass_authentication(true)
        .environment(environment)
        .build()
        .expect("test configuration is valid")
}

pub fn create_app(config: WebservicesConfig, client: Arc<ScriptedClient>) -> Router {
    create_app_with_client(config, client)
}

pub fn create_test_server(config: WebservicesConfig, client: Arc<ScriptedClient>) -> TestServer {
    TestServer::new(create_app(config, client)).expect("failed to start test server")
}
