//! Registration and token route handlers.
//!
//! These are the only unauthenticated endpoints: registration is the entry
//! point that creates credentials, and the token endpoints turn credentials
//! into bearer tokens.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use clientele_core::UserId;

use crate::auth::{TokenPair, TokenType, decode_token, issue_pair};
use crate::error::{ApiError, Result};
use crate::middleware::ApiJson;
use crate::services::AccountService;
use crate::state::AppState;
use crate::validation::RegisterPayload;

const INVALID_REFRESH: &str = "Token is invalid or expired";

/// POST /api/register/
///
/// Creates a new account. The response carries the new user's identity and
/// a confirmation message; the password is never echoed in any form.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterPayload>,
) -> Result<(StatusCode, Json<Value>)> {
    let account = AccountService::new(state.users()).register(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user_id": account.id,
            "username": account.username,
            "email": account.email,
        })),
    ))
}

/// Credentials presented to the token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/token/
///
/// Verifies credentials and issues an access/refresh pair.
pub async fn token_obtain(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TokenRequest>,
) -> Result<Json<TokenPair>> {
    let account = AccountService::new(state.users())
        .verify_credentials(&request.username, &request.password)
        .await?;

    let pair = issue_pair(account.id, state.config())
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(pair))
}

/// Body of a refresh request.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// POST /api/token/refresh/
///
/// Validates a refresh token and rotates the pair: the response carries a
/// new access token and a new refresh token.
pub async fn token_refresh(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RefreshRequest>,
) -> Result<Json<TokenPair>> {
    let claims = decode_token(&request.refresh, TokenType::Refresh, state.config())
        .map_err(|_| ApiError::Unauthorized(INVALID_REFRESH.to_string()))?;

    let pair = issue_pair(UserId::new(claims.sub), state.config())
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(pair))
}
