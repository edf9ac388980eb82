//! Registration payload validation.

use serde::Deserialize;

use clientele_core::{Email, EmailError};

use crate::db::UserStore;
use crate::error::{ApiError, ValidationError};

/// Maximum length of a username.
pub const MAX_USERNAME_LENGTH: usize = 150;
/// Maximum length of an account email.
pub const MAX_EMAIL_LENGTH: usize = 255;
/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Raw registration payload as decoded from a request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterPayload {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A registration payload that passed validation.
///
/// The password is still plaintext here; hashing happens in the account
/// service immediately before the store insert.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub username: String,
    pub email: Email,
    pub password: String,
}

/// Validate a registration payload against the identity store.
///
/// # Errors
///
/// Returns a field-scoped [`ApiError::Validation`] for missing/over-long
/// fields, taken usernames, and already-registered emails. The store checks
/// are advisory; the unique indexes settle races at insert time.
pub async fn validate_registration(
    payload: RegisterPayload,
    store: &dyn UserStore,
) -> Result<ValidRegistration, ApiError> {
    let username = payload
        .username
        .ok_or_else(|| ValidationError::required("username"))?;
    if username.is_empty() {
        return Err(ValidationError::blank("username").into());
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::too_long("username", MAX_USERNAME_LENGTH).into());
    }

    let raw_email = payload
        .email
        .ok_or_else(|| ValidationError::required("email"))?;
    let email = Email::parse_with_limit(&raw_email, MAX_EMAIL_LENGTH).map_err(|e| match e {
        EmailError::Empty => ValidationError::blank("email"),
        EmailError::TooLong { max } => ValidationError::too_long("email", max),
        EmailError::Malformed => ValidationError::new("email", "Enter a valid email address."),
    })?;

    let password = payload
        .password
        .ok_or_else(|| ValidationError::required("password"))?;
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new(
            "password",
            format!(
                "This password is too short. It must contain at least {MIN_PASSWORD_LENGTH} characters."
            ),
        )
        .into());
    }

    if store.username_exists(&username).await? {
        return Err(ValidationError::duplicate_username().into());
    }
    if store.email_exists(&email).await? {
        return Err(ValidationError::duplicate_email().into());
    }

    Ok(ValidRegistration {
        username,
        email,
        password,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryUserStore;
    use crate::models::NewUser;

    fn payload(username: &str, email: &str) -> RegisterPayload {
        RegisterPayload {
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            password: Some("correct horse battery".to_string()),
        }
    }

    async fn store_with_user(username: &str, email: &str) -> MemoryUserStore {
        let store = MemoryUserStore::new();
        store
            .insert(NewUser {
                username: username.to_string(),
                email: Email::parse(email).unwrap(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_valid_registration_passes() {
        let store = MemoryUserStore::new();
        let valid = validate_registration(payload("ada", "ada@x.com"), &store)
            .await
            .unwrap();
        assert_eq!(valid.username, "ada");
        assert_eq!(valid.email.as_str(), "ada@x.com");
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let store = MemoryUserStore::new();
        let err = validate_registration(RegisterPayload::default(), &store)
            .await
            .unwrap_err();
        assert!(matches!(&err, ApiError::Validation(v) if v.field == "username"));
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let store = store_with_user("ada", "ada@x.com").await;
        let err = validate_registration(payload("ada", "new@x.com"), &store)
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            ApiError::Validation(v) if v.reason == "This username is already taken."
        ));
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let store = store_with_user("ada", "ada@x.com").await;
        let err = validate_registration(payload("grace", "ada@x.com"), &store)
            .await
            .unwrap_err();
        assert!(matches!(&err, ApiError::Validation(v) if v.field == "email"));
    }

    #[tokio::test]
    async fn test_short_password() {
        let store = MemoryUserStore::new();
        let mut p = payload("ada", "ada@x.com");
        p.password = Some("short".to_string());
        let err = validate_registration(p, &store).await.unwrap_err();
        assert!(matches!(&err, ApiError::Validation(v) if v.field == "password"));
    }

    #[tokio::test]
    async fn test_username_length_cap() {
        let store = MemoryUserStore::new();
        let err = validate_registration(payload(&"u".repeat(151), "ada@x.com"), &store)
            .await
            .unwrap_err();
        assert!(matches!(&err, ApiError::Validation(v) if v.field == "username"));
    }
}
