//! User account domain types.

use chrono::{DateTime, Utc};

use clientele_core::{Email, UserId};

/// A registered user account (domain type).
///
/// The password hash is deliberately not part of this type: it is only ever
/// exposed through [`crate::db::UserStore::find_by_username`] for credential
/// checks and never travels anywhere near a response body.
#[derive(Debug, Clone)]
pub struct UserAccount {
    /// Database-assigned user ID.
    pub id: UserId,
    /// Unique username (at most 150 characters).
    pub username: String,
    /// Email address, unique across all accounts.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Validated fields for inserting a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Email,
    /// Argon2 hash of the registration password.
    pub password_hash: String,
}
