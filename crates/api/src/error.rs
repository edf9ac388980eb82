//! Unified error handling.
//!
//! Provides a single `ApiError` type returned by all route handlers. Client
//! errors serialize into the field-scoped JSON shapes the API contract
//! promises; store failures are logged and collapsed into a generic 500
//! without leaking internals. Unique-constraint conflicts raced past the
//! advisory validator checks are re-mapped here into the same 400 validation
//! shape instead of surfacing as server errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::{RepositoryError, UniqueViolation};

/// A field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Payload field the failure is scoped to.
    pub field: &'static str,
    /// Human-readable reason, as shown to the client.
    pub reason: String,
}

impl ValidationError {
    /// Create a validation error for `field`.
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    /// A required field was missing from the payload.
    #[must_use]
    pub fn required(field: &'static str) -> Self {
        Self::new(field, "This field is required.")
    }

    /// A supplied field was empty.
    #[must_use]
    pub fn blank(field: &'static str) -> Self {
        Self::new(field, "This field may not be blank.")
    }

    /// A supplied field exceeded its maximum length.
    #[must_use]
    pub fn too_long(field: &'static str, max: usize) -> Self {
        Self::new(
            field,
            format!("Ensure this field has no more than {max} characters."),
        )
    }

    /// The email is already taken (customer or account namespace).
    #[must_use]
    pub fn duplicate_email() -> Self {
        Self::new("email", "This email address is already in use.")
    }

    /// The username is already taken.
    #[must_use]
    pub fn duplicate_username() -> Self {
        Self::new("username", "This username is already taken.")
    }

    /// The mobile number does not match the accepted format.
    #[must_use]
    pub fn invalid_mobile() -> Self {
        Self::new(
            "mobile",
            "Mobile number must be in a valid format (e.g., +1234567890 or 9876543210).",
        )
    }
}

impl From<UniqueViolation> for ValidationError {
    fn from(violation: UniqueViolation) -> Self {
        match violation {
            UniqueViolation::CustomerEmail | UniqueViolation::AccountEmail => {
                Self::duplicate_email()
            }
            UniqueViolation::Username => Self::duplicate_username(),
        }
    }
}

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request payload failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Request body could not be decoded at all.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Caller is not authenticated (or presented bad credentials).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("not found")]
    NotFound,

    /// Store operation failed for a reason other than a unique conflict.
    #[error("repository error: {0}")]
    Repository(RepositoryError),

    /// Internal failure outside the store (hashing, token signing).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(violation) => Self::Validation(violation.into()),
            other => Self::Repository(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(err) => {
                // Body shape: {"<field>": ["<reason>"]}
                let mut body = serde_json::Map::new();
                body.insert(err.field.to_string(), json!([err.reason]));
                (StatusCode::BAD_REQUEST, Json(serde_json::Value::Object(body))).into_response()
            }
            Self::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": detail })),
            )
                .into_response(),
            Self::Unauthorized(detail) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": detail })),
            )
                .into_response(),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": "Not found." })),
            )
                .into_response(),
            Self::Repository(_) | Self::Internal(_) => {
                tracing::error!(error = %self, "Internal failure while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal server error." })),
                )
                    .into_response()
            }
        }
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;
