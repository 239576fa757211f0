#![allow(dead_code)]
//! Shared helpers for the HTTP integration tests
//!
//! Builds the full application router over the in-memory executor so the
//! tests exercise routing, validation, the write policy and response
//! shaping together, without a live database.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use vitrine::db::MemoryExecutor;
use vitrine::gateway::Gateway;
use vitrine::http_server::{GatewayState, HttpServer, HttpServerConfig};

/// Application router backed by a fresh in-memory executor.
pub fn app() -> Router {
    router_over(Arc::new(MemoryExecutor::new()))
}

/// Application router whose executor fails every statement.
pub fn failing_app() -> Router {
    router_over(Arc::new(MemoryExecutor::failing()))
}

/// Application router restricted to an explicit CORS origin list.
pub fn app_with_origins(origins: &[&str]) -> Router {
    let config = HttpServerConfig {
        cors_origins: origins.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    };
    let state = GatewayState::new(Gateway::new(Arc::new(MemoryExecutor::new())));
    HttpServer::new(config, state).router()
}

fn router_over(executor: Arc<MemoryExecutor>) -> Router {
    let state = GatewayState::new(Gateway::new(executor));
    HttpServer::new(HttpServerConfig::default(), state).router()
}

/// Send one request and return the status plus the parsed JSON body.
pub async fn call(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let body = match body {
        Some(v) => Body::from(serde_json::to_string(&v).unwrap()),
        None => Body::empty(),
    };
    let req = builder.body(body).unwrap();

    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
