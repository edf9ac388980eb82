//! Authentication middleware and extractors.
//!
//! Provides an extractor for requiring a valid JWT bearer token in route
//! handlers.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use clientele_core::UserId;

use crate::auth::{TokenType, decode_token};
use crate::error::ApiError;
use crate::state::AppState;

const MISSING_CREDENTIALS: &str = "Authentication credentials were not provided.";
const INVALID_TOKEN: &str = "Given token not valid for any token type";

/// The identity asserted by a verified access token.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    /// User ID from the token's `sub` claim.
    pub user_id: UserId,
}

/// Extractor that requires a valid `Authorization: Bearer <access token>`.
///
/// Rejects with 401 if the header is missing, malformed, or carries a token
/// that is invalid, expired, or of the wrong type.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, user {}!", user.user_id)
/// }
/// ```
pub struct RequireAuth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized(MISSING_CREDENTIALS.to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized(MISSING_CREDENTIALS.to_string()))?;

        let claims = decode_token(token, TokenType::Access, state.config())
            .map_err(|_| ApiError::Unauthorized(INVALID_TOKEN.to_string()))?;

        Ok(Self(AuthenticatedUser {
            user_id: UserId::new(claims.sub),
        }))
    }
}
