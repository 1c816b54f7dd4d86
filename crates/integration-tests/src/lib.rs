//! Integration tests for the customer registry.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot` over
//! the in-memory store, so no database or running server is needed.
//!
//! ```bash
//! cargo test -p customer-registry-integration-tests
//! ```

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use customer_registry_api::config::{RegistryConfig, StoreBackend};
use customer_registry_api::db::MemoryCustomerStore;
use customer_registry_api::routes;
use customer_registry_api::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

/// Largest response body the helpers will read.
const BODY_LIMIT: usize = 1024 * 1024;

/// A router over a fresh in-memory store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryCustomerStore>,
}

/// Response status and body, with the body parsed as JSON when possible.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub text: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text)
            .unwrap_or_else(|e| panic!("body is not JSON ({e}): {}", self.text))
    }
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        Self::with_cors_origin(None)
    }

    #[must_use]
    pub fn with_cors_origin(cors_origin: Option<&str>) -> Self {
        let config = RegistryConfig {
            store: StoreBackend::Memory,
            database_url: None,
            host: [127, 0, 0, 1].into(),
            port: 0,
            cors_origin: cors_origin.map(str::to_owned),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        };
        let store = Arc::new(MemoryCustomerStore::new());
        let router = routes::router(AppState::new(config, store.clone()));
        Self { router, store }
    }

    /// Send a request and collect the response.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body cannot be read.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|e| panic!("router failed: {e}"));
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), BODY_LIMIT)
            .await
            .unwrap_or_else(|e| panic!("failed to read body: {e}"));
        TestResponse {
            status,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(request("GET", uri, Body::empty())).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.send(json_request("POST", uri, body)).await
    }

    pub async fn put_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.send(json_request("PUT", uri, body)).await
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a request.
///
/// # Panics
///
/// Panics if `method` or `uri` are invalid.
#[must_use]
pub fn request(method: &str, uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .unwrap_or_else(|e| panic!("invalid request: {e}"))
}

/// Build a request with a JSON body.
///
/// # Panics
///
/// Panics if `method` or `uri` are invalid.
#[must_use]
pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap_or_else(|e| panic!("invalid request: {e}"))
}
