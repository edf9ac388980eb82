//! Integration test harness for Clientele.
//!
//! Builds the real API router over the in-memory stores and drives it
//! request-by-request with `tower::ServiceExt::oneshot` - no network, no
//! database, full HTTP semantics (routing, extractors, status codes, JSON
//! bodies).
//!
//! # Example
//!
//! ```rust,ignore
//! let app = test_app();
//! let token = obtain_access_token(&app).await;
//! let (status, body) = send(&app, json_request(
//!     Method::GET, "/api/customers/", Some(&token), None,
//! )).await;
//! assert_eq!(status, StatusCode::OK);
//! ```

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use clientele_api::config::ClienteleConfig;
use clientele_api::db::{MemoryCustomerStore, MemoryUserStore};
use clientele_api::routes;
use clientele_api::state::AppState;

/// Configuration used by the test router. No database, fixed secret.
#[must_use]
pub fn test_config(page_size: usize) -> ClienteleConfig {
    ClienteleConfig {
        database_url: SecretString::from("postgres://unused-in-tests"),
        host: "127.0.0.1".parse().expect("valid test host"),
        port: 8000,
        jwt_secret: SecretString::from("integration-test-jwt-secret-0123456789"),
        access_token_ttl_secs: 3600,
        refresh_token_ttl_secs: 7200,
        page_size,
    }
}

/// Build the full router over empty in-memory stores.
#[must_use]
pub fn test_app() -> Router {
    test_app_with_page_size(10)
}

/// Build the router with a custom list page size.
#[must_use]
pub fn test_app_with_page_size(page_size: usize) -> Router {
    let state = AppState::with_stores(
        test_config(page_size),
        Arc::new(MemoryCustomerStore::new()),
        Arc::new(MemoryUserStore::new()),
    );
    routes::router(state)
}

/// Build a JSON request, optionally with a bearer token.
#[must_use]
pub fn json_request(
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let body = body.map_or_else(Body::empty, |value| Body::from(value.to_string()));
    builder.body(body).expect("valid test request")
}

/// Send a request through the router and return status plus parsed body
/// (`Value::Null` for empty bodies such as 204 responses).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router never fails");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is JSON")
    };

    (status, body)
}

/// Register a default test account and return a valid access token for it.
pub async fn obtain_access_token(app: &Router) -> String {
    register_user(app, "tester", "tester@example.com", "hunter2hunter2").await;

    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/api/token/",
            None,
            Some(json!({"username": "tester", "password": "hunter2hunter2"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "token endpoint failed: {body}");

    body["access"]
        .as_str()
        .expect("access token present")
        .to_string()
}

/// Register an account through the public endpoint.
pub async fn register_user(app: &Router, username: &str, email: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/api/register/",
            None,
            Some(json!({"username": username, "email": email, "password": password})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");
    body
}

/// Create a customer through the API and return its body.
pub async fn create_customer(app: &Router, token: &str, name: &str, email: &str) -> Value {
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/api/customers/",
            Some(token),
            Some(json!({
                "name": name,
                "email": email,
                "mobile": "+1234567890",
                "address": "1 Lane",
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "customer create failed: {body}");
    body
}
