//! Customer CRUD route handlers.
//!
//! Every handler requires an authenticated caller and delegates to
//! [`CustomerService`]; responses serialize the domain [`Customer`] directly.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use clientele_core::CustomerId;

use crate::error::{ApiError, Result};
use crate::middleware::{ApiJson, RequireAuth};
use crate::models::Customer;
use crate::pagination::Page;
use crate::services::CustomerService;
use crate::state::AppState;
use crate::validation::CustomerPayload;

/// Query parameters accepted by the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring filter on name or email.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
}

/// A path segment that does not parse as a UUID can never name a record.
fn parse_id(raw: &str) -> Result<CustomerId> {
    Uuid::parse_str(raw)
        .map(CustomerId::new)
        .map_err(|_| ApiError::NotFound)
}

/// GET /api/customers/
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Customer>>> {
    let service = CustomerService::new(state.customers(), state.config().page_size);
    let page = service
        .list(query.search.as_deref(), query.page.unwrap_or(1))
        .await?;
    Ok(Json(page))
}

/// POST /api/customers/
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    ApiJson(payload): ApiJson<CustomerPayload>,
) -> Result<(StatusCode, Json<Customer>)> {
    let service = CustomerService::new(state.customers(), state.config().page_size);
    let customer = service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /api/customers/{id}/
pub async fn retrieve(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Result<Json<Customer>> {
    let service = CustomerService::new(state.customers(), state.config().page_size);
    let customer = service.get(parse_id(&id)?).await?;
    Ok(Json(customer))
}

/// PUT /api/customers/{id}/
pub async fn replace(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<CustomerPayload>,
) -> Result<Json<Customer>> {
    let service = CustomerService::new(state.customers(), state.config().page_size);
    let customer = service.replace(parse_id(&id)?, payload).await?;
    Ok(Json(customer))
}

/// PATCH /api/customers/{id}/
pub async fn partial_update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<CustomerPayload>,
) -> Result<Json<Customer>> {
    let service = CustomerService::new(state.customers(), state.config().page_size);
    let customer = service.partial_update(parse_id(&id)?, payload).await?;
    Ok(Json(customer))
}

/// DELETE /api/customers/{id}/
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let service = CustomerService::new(state.customers(), state.config().page_size);
    service.remove(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
