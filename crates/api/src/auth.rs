//! JWT issuance and verification.
//!
//! Tokens are HS256-signed with the configured secret. Every login issues an
//! access/refresh pair; refreshing validates the refresh token and rotates
//! the pair. The `token_type` claim keeps the two roles apart so a refresh
//! token can never be replayed against a protected endpoint.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use clientele_core::UserId;

use crate::config::ClienteleConfig;

/// Which role a token was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived token presented as the bearer credential.
    Access,
    /// Longer-lived token accepted only by the refresh endpoint.
    Refresh,
}

/// Claims carried by every issued token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID the token was issued to.
    pub sub: i64,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
    /// Access or refresh.
    pub token_type: TokenType,
}

/// An access/refresh token pair, serialized directly as the token endpoint
/// response body.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Errors from token encoding or verification.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The token's signature/structure/claims did not check out, or it was
    /// presented with the wrong `token_type`.
    #[error("token is invalid")]
    Invalid,
    /// The token was valid but past its expiry.
    #[error("token has expired")]
    Expired,
    /// Signing a fresh token failed.
    #[error("failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

/// Issue a fresh access/refresh pair for `user_id`.
///
/// # Errors
///
/// Returns [`TokenError::Signing`] if encoding fails.
pub fn issue_pair(user_id: UserId, config: &ClienteleConfig) -> Result<TokenPair, TokenError> {
    let now = Utc::now();
    let access = encode_token(
        user_id,
        TokenType::Access,
        now.timestamp(),
        (now + TimeDelta::seconds(config.access_token_ttl_secs)).timestamp(),
        config,
    )?;
    let refresh = encode_token(
        user_id,
        TokenType::Refresh,
        now.timestamp(),
        (now + TimeDelta::seconds(config.refresh_token_ttl_secs)).timestamp(),
        config,
    )?;
    Ok(TokenPair { access, refresh })
}

fn encode_token(
    user_id: UserId,
    token_type: TokenType,
    iat: i64,
    exp: i64,
    config: &ClienteleConfig,
) -> Result<String, TokenError> {
    let claims = Claims {
        sub: user_id.as_i64(),
        iat,
        exp,
        token_type,
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes()),
    )
    .map_err(TokenError::Signing)
}

/// Decode and verify a token, requiring it to be of the `expected` type.
///
/// # Errors
///
/// Returns [`TokenError::Expired`] for expired tokens and
/// [`TokenError::Invalid`] for anything else that fails verification,
/// including a valid token of the wrong type.
pub fn decode_token(
    token: &str,
    expected: TokenType,
    config: &ClienteleConfig,
) -> Result<Claims, TokenError> {
    let validation = Validation::new(Algorithm::HS256);

    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes()),
        &validation,
    )
    .map_err(|error| match error.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })?;

    if data.claims.token_type != expected {
        return Err(TokenError::Invalid);
    }

    Ok(data.claims)
}
