//! Request middleware and extractors.

pub mod auth;
pub mod json;

pub use auth::{AuthenticatedUser, RequireAuth};
pub use json::ApiJson;
