//! Account service.
//!
//! Registration and credential checks. Password hashing is Argon2 with a
//! per-hash random salt; the plaintext never leaves this module and the
//! hash never leaves the store layer.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::db::UserStore;
use crate::error::{ApiError, Result};
use crate::models::{NewUser, UserAccount};
use crate::validation::{RegisterPayload, validate_registration};

/// Message returned for any credential failure. Deliberately identical for
/// unknown usernames and wrong passwords.
const BAD_CREDENTIALS: &str = "No active account found with the given credentials";

/// Service for account registration and login.
pub struct AccountService<'a> {
    users: &'a dyn UserStore,
}

impl<'a> AccountService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(users: &'a dyn UserStore) -> Self {
        Self { users }
    }

    /// Validate a registration payload, hash the password and create the
    /// account. Exactly one row is created on success.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for bad payloads and duplicate
    /// username/email (advisory check or store-level race alike).
    pub async fn register(&self, payload: RegisterPayload) -> Result<UserAccount> {
        let valid = validate_registration(payload, self.users).await?;
        let password_hash = hash_password(&valid.password)?;

        let account = self
            .users
            .insert(NewUser {
                username: valid.username,
                email: valid.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %account.id, "Registered new account");
        Ok(account)
    }

    /// Check a username/password pair and return the matching account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` with a uniform message when the
    /// username is unknown or the password does not match.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<UserAccount> {
        let Some((account, password_hash)) = self.users.find_by_username(username).await? else {
            return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
        };

        if !verify_password(password, &password_hash) {
            return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        Ok(account)
    }
}

/// Hash a password with Argon2 and a fresh random salt.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash.
fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
