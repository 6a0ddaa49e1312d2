//! Shared helpers for `leadbridge-api` integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use leadbridge_api::context::DynCredentialStore;
use leadbridge_api::{router, AppContext};
use leadbridge_common::auth::MemoryCredentialStore;
use leadbridge_domain::BridgeConfig;
use leadbridge_infra::EnvSettings;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::MockServer;

pub const REDIRECT_URI: &str = "http://localhost:8000/oauth/callback";

pub fn full_env() -> Vec<(&'static str, &'static str)> {
    vec![
        ("API_TOKEN", "crm-token"),
        ("COMPANY_DOMAIN", "acme"),
        ("client_id", "cid"),
        ("client_secret", "secret"),
        ("redirect_uri", REDIRECT_URI),
    ]
}

pub fn env_without(key: &str) -> Vec<(&'static str, &'static str)> {
    full_env().into_iter().filter(|(k, _)| *k != key).collect()
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryCredentialStore>,
}

/// App whose OAuth provider and CRM both point at `server`.
pub fn app(server: &MockServer, env: Vec<(&'static str, &'static str)>) -> TestApp {
    let config = BridgeConfig {
        oauth_base_url: server.uri(),
        crm_base_url: Some(server.uri()),
        ..BridgeConfig::default()
    };
    let store = Arc::new(MemoryCredentialStore::new());
    let dyn_store: Arc<DynCredentialStore> = store.clone();
    let context =
        AppContext::with_parts(config, EnvSettings::from_pairs(env), dyn_store).unwrap();
    TestApp { router: router(Arc::new(context)), store }
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_empty(uri: &str) -> Request<Body> {
    Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap()
}
