//! Database operations for the Clientele `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `customer` - Customer records managed through the CRUD API
//! - `user_account` - Registered API users (credentials for JWT login)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run automatically
//! at service startup via `sqlx::migrate!`.
//!
//! # Store traits
//!
//! Handlers, services and validators talk to [`CustomerStore`] / [`UserStore`]
//! trait objects instead of the pool directly, so the whole router can run
//! against the in-memory fakes in [`memory`] for tests. Uniqueness is
//! ultimately enforced by the store (a unique index in Postgres, an atomic
//! check-and-insert in the fakes); validator-level existence checks are
//! advisory only.

pub mod customers;
pub mod memory;
pub mod users;

use core::fmt;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use clientele_core::{CustomerId, Email};

use crate::models::{Customer, CustomerUpdate, NewCustomer, NewUser, UserAccount};

pub use customers::PgCustomerStore;
pub use memory::{MemoryCustomerStore, MemoryUserStore};
pub use users::PgUserStore;

/// Which unique constraint a conflicting write ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueViolation {
    /// `customer.email`
    CustomerEmail,
    /// `user_account.username`
    Username,
    /// `user_account.email`
    AccountEmail,
}

impl fmt::Display for UniqueViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CustomerEmail => write!(f, "customer email"),
            Self::Username => write!(f, "username"),
            Self::AccountEmail => write!(f, "account email"),
        }
    }
}

/// Errors that can occur in repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Unique constraint violation.
    #[error("unique constraint violation on {0}")]
    Conflict(UniqueViolation),
}

/// Read/write access to customer records.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// List customers in insertion order, optionally filtered by a
    /// case-insensitive substring match against `name` or `email`.
    async fn list(&self, search: Option<&str>) -> Result<Vec<Customer>, RepositoryError>;

    /// Look up a customer by ID.
    async fn find(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    /// Advisory read-only check whether `email` is taken by a customer other
    /// than `exclude`.
    async fn email_exists(
        &self,
        email: &Email,
        exclude: Option<CustomerId>,
    ) -> Result<bool, RepositoryError>;

    /// Insert a new customer, assigning `created_at`/`updated_at`.
    ///
    /// Fails with [`RepositoryError::Conflict`] if the email is already taken;
    /// this is the authoritative uniqueness check.
    async fn insert(&self, new: NewCustomer) -> Result<Customer, RepositoryError>;

    /// Apply validated field changes to an existing customer, refreshing
    /// `updated_at`. Returns `None` if no record with `id` exists.
    ///
    /// Same conflict semantics as [`CustomerStore::insert`].
    async fn update(
        &self,
        id: CustomerId,
        changes: CustomerUpdate,
    ) -> Result<Option<Customer>, RepositoryError>;

    /// Delete a customer. Returns whether a record was removed.
    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError>;
}

/// Read/write access to user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Advisory read-only check whether `username` is taken.
    async fn username_exists(&self, username: &str) -> Result<bool, RepositoryError>;

    /// Advisory read-only check whether `email` is registered.
    async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError>;

    /// Insert a new account.
    ///
    /// Fails with [`RepositoryError::Conflict`] naming the violated
    /// constraint (username vs email) if either unique index fires.
    async fn insert(&self, new: NewUser) -> Result<UserAccount, RepositoryError>;

    /// Look up an account and its password hash for credential checks.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(UserAccount, String)>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
