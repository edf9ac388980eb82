//! JSON body extractor with a structured rejection.
//!
//! Axum's default `Json` rejection is plain text; every error this API
//! returns is JSON, so undecodable bodies go through [`ApiError`] too.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Drop-in replacement for `Json` whose rejection is a 400 with a
/// `{"detail": ...}` body instead of axum's plain-text default.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::BadRequest(format!("JSON parse error - {}", rejection.body_text()))
            })?;
        Ok(Self(value))
    }
}
