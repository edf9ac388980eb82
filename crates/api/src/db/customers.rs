//! Customer repository backed by `PostgreSQL`.
//!
//! Queries use runtime-checked `query_as` so the crate builds without a live
//! database; rows are converted into domain types through [`CustomerRow`],
//! with invalid stored values surfaced as `RepositoryError::DataCorruption`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use clientele_core::{CustomerId, Email, Mobile};

use super::{CustomerStore, RepositoryError, UniqueViolation};
use crate::models::{Customer, CustomerUpdate, NewCustomer};

/// Raw `customer` table row.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    email: String,
    mobile: String,
    address: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let mobile = Mobile::parse(&row.mobile).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid mobile in database: {e}"))
        })?;

        Ok(Self {
            id: CustomerId::new(row.id),
            name: row.name,
            email,
            mobile,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Escape `LIKE` metacharacters so a search term matches as a literal
/// substring, never as a pattern.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Map a sqlx error to `Conflict` when the customer email unique index fired.
fn map_insert_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(UniqueViolation::CustomerEmail);
    }
    RepositoryError::Database(e)
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn list(&self, search: Option<&str>) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, name, email, mobile, address, created_at, updated_at
            FROM customer
            WHERE $1::text IS NULL
               OR name ILIKE '%' || $1 || '%' ESCAPE '\'
               OR email ILIKE '%' || $1 || '%' ESCAPE '\'
            ORDER BY created_at, id
            ",
        )
        .bind(search.map(escape_like))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Customer::try_from).collect()
    }

    async fn find(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, name, email, mobile, address, created_at, updated_at
            FROM customer
            WHERE id = $1
            ",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }

    async fn email_exists(
        &self,
        email: &Email,
        exclude: Option<CustomerId>,
    ) -> Result<bool, RepositoryError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS (
                SELECT 1 FROM customer
                WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            ",
        )
        .bind(email.as_str())
        .bind(exclude.map(|id| id.as_uuid()))
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(&self, new: NewCustomer) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            INSERT INTO customer (id, name, email, mobile, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, mobile, address, created_at, updated_at
            ",
        )
        .bind(new.id.as_uuid())
        .bind(&new.name)
        .bind(new.email.as_str())
        .bind(new.mobile.as_str())
        .bind(&new.address)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Customer::try_from(row)
    }

    async fn update(
        &self,
        id: CustomerId,
        changes: CustomerUpdate,
    ) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            UPDATE customer SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                mobile = COALESCE($4, mobile),
                address = COALESCE($5, address),
                updated_at = now()
            WHERE id = $1
            RETURNING id, name, email, mobile, address, created_at, updated_at
            ",
        )
        .bind(id.as_uuid())
        .bind(changes.name)
        .bind(changes.email.map(Email::into_inner))
        .bind(changes.mobile.map(Mobile::into_inner))
        .bind(changes.address)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_insert_error)?;

        row.map(Customer::try_from).transpose()
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM customer WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_neutralizes_metacharacters() {
        assert_eq!(escape_like("100%"), r"100\%");
        assert_eq!(escape_like("a_c"), r"a\_c");
        assert_eq!(escape_like(r"back\slash"), r"back\\slash");
        assert_eq!(escape_like("%_\\"), r"\%\_\\");
    }

    #[test]
    fn test_escape_like_passes_plain_terms_through() {
        assert_eq!(escape_like("Ada Lovelace"), "Ada Lovelace");
        assert_eq!(escape_like("ada@x.com"), "ada@x.com");
    }
}
