//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Liveness check
//! GET    /health/ready            - Readiness check (DB connectivity)
//!
//! # Accounts & tokens (no auth required)
//! POST   /api/register/           - Register a new account
//! POST   /api/token/              - Obtain access/refresh pair
//! POST   /api/token/refresh/      - Rotate a refresh token
//!
//! # Customers (bearer token required)
//! GET    /api/customers/          - Paginated list (?search=, ?page=)
//! POST   /api/customers/          - Create
//! GET    /api/customers/{id}/     - Retrieve
//! PUT    /api/customers/{id}/     - Full update
//! PATCH  /api/customers/{id}/     - Partial update
//! DELETE /api/customers/{id}/     - Delete
//! ```

pub mod auth;
pub mod customers;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        // Browser clients are served from arbitrary origins.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Create the `/api` routes router.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/register/", post(auth::register))
        .route("/token/", post(auth::token_obtain))
        .route("/token/refresh/", post(auth::token_refresh))
        .route(
            "/customers/",
            get(customers::list).post(customers::create),
        )
        .route(
            "/customers/{id}/",
            get(customers::retrieve)
                .put(customers::replace)
                .patch(customers::partial_update)
                .delete(customers::remove),
        )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK. A state without a
/// pool (in-memory stores) is always ready.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.pool() {
        None => StatusCode::OK,
        Some(pool) => match sqlx::query("SELECT 1").fetch_one(pool).await {
            Ok(_) => StatusCode::OK,
            Err(_) => StatusCode::SERVICE_UNAVAILABLE,
        },
    }
}
