#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use formhist_api::auth::jwt::{generate_access_token, JwtConfig};
use formhist_api::config::{LogFormat, ServerConfig, StoreBackend};
use formhist_api::router::build_app_router;
use formhist_api::state::AppState;
use formhist_db::MemoryVersionStore;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults and the in-memory backend.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        store_backend: StoreBackend::Memory,
        database_url: None,
        database_max_connections: 1,
        log_format: LogFormat::Pretty,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router over `store`, with the same middleware
/// stack as production.
pub fn build_test_app(store: Arc<MemoryVersionStore>) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A fresh in-memory store and a router over it. The store handle is kept
/// for failure injection and direct inspection.
pub fn test_app() -> (Router, Arc<MemoryVersionStore>) {
    let store = Arc::new(MemoryVersionStore::new());
    (build_test_app(Arc::clone(&store)), store)
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

pub fn token_for(actor: &str, role: &str) -> String {
    generate_access_token(actor, role, &test_config().jwt).unwrap()
}

pub fn clinician_token() -> String {
    token_for("dr-okafor", "clinician")
}

pub fn admin_token() -> String {
    token_for("admin-1", "admin")
}

pub fn staff_token() -> String {
    token_for("front-desk", "staff")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Send a request through the router, optionally authenticated and with a
/// JSON body.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a record over HTTP and return its id.
pub async fn create_record(app: &Router, token: &str, payload: Value) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/records",
        token,
        serde_json::json!({ "payload": payload }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Replace a record's payload over HTTP and return the response body.
pub async fn update_record(app: &Router, token: &str, id: i64, payload: Value) -> Value {
    let response = put_json(
        app.clone(),
        &format!("/api/v1/records/{id}"),
        token,
        serde_json::json!({ "payload": payload }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}
