//! Customer domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use clientele_core::{CustomerId, Email, Mobile};

/// A customer record (domain type).
///
/// Serialized as-is in API responses; `id`, `created_at` and `updated_at`
/// are server-assigned and never accepted from clients.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    /// Unique customer ID, generated at creation.
    pub id: CustomerId,
    /// Customer name (at most 100 characters).
    pub name: String,
    /// Email address, unique across all customers.
    pub email: Email,
    /// Mobile number.
    pub mobile: Mobile,
    /// Free-text postal address.
    pub address: String,
    /// When the record was created. Immutable.
    pub created_at: DateTime<Utc>,
    /// When the record was last mutated.
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for inserting a new customer.
///
/// Produced by [`crate::validation::customer::validate_create`]; the store
/// assigns `created_at`/`updated_at` at insert time.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    /// Server-generated ID for the new record.
    pub id: CustomerId,
    pub name: String,
    pub email: Email,
    pub mobile: Mobile,
    pub address: String,
}

/// Validated field changes for an update.
///
/// `None` means "leave the stored value unchanged". A full (PUT) update sets
/// every field to `Some`; a partial (PATCH) update sets only the supplied
/// ones. Every applied update refreshes `updated_at`.
#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub mobile: Option<Mobile>,
    pub address: Option<String>,
}
