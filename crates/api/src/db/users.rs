//! User account repository backed by `PostgreSQL`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use clientele_core::{Email, UserId};

use super::{RepositoryError, UniqueViolation, UserStore};
use crate::models::{NewUser, UserAccount};

/// Raw `user_account` table row.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_account(self) -> Result<(UserAccount, String), RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok((
            UserAccount {
                id: UserId::new(self.id),
                username: self.username,
                email,
                created_at: self.created_at,
            },
            self.password_hash,
        ))
    }
}

/// Map a sqlx error to `Conflict`, distinguishing which unique index fired
/// by its constraint name.
fn map_insert_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        let violation = match db_err.constraint() {
            Some("user_account_email_key") => UniqueViolation::AccountEmail,
            _ => UniqueViolation::Username,
        };
        return RepositoryError::Conflict(violation);
    }
    RepositoryError::Database(e)
}

/// Repository for user account database operations.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn username_exists(&self, username: &str) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM user_account WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM user_account WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(&self, new: NewUser) -> Result<UserAccount, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO user_account (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            ",
        )
        .bind(&new.username)
        .bind(new.email.as_str())
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        let (account, _) = row.into_account()?;
        Ok(account)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(UserAccount, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, username, email, password_hash, created_at
            FROM user_account
            WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_account).transpose()
    }
}
