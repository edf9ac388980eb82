//! Customer service.
//!
//! Each operation is independent: look up, validate against the current
//! store state, mutate, return. Store-level unique conflicts bubble up
//! through `ApiError::from` as the same 400 the validator would produce.

use clientele_core::CustomerId;

use crate::db::CustomerStore;
use crate::error::{ApiError, Result};
use crate::models::Customer;
use crate::pagination::{Page, paginate};
use crate::validation::{CustomerPayload, validate_create, validate_update};

/// Service for customer CRUD operations.
pub struct CustomerService<'a> {
    store: &'a dyn CustomerStore,
    page_size: usize,
}

impl<'a> CustomerService<'a> {
    /// Create a new customer service.
    #[must_use]
    pub const fn new(store: &'a dyn CustomerStore, page_size: usize) -> Self {
        Self { store, page_size }
    }

    /// List customers, optionally filtered by `search`, as one page.
    ///
    /// # Errors
    ///
    /// Returns a repository error if the listing fails.
    pub async fn list(&self, search: Option<&str>, page: u32) -> Result<Page<Customer>> {
        let customers = self.store.list(search).await?;
        Ok(paginate(customers, page, self.page_size))
    }

    /// Validate and persist a new customer.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for bad payloads (including duplicate
    /// emails, advisory or raced).
    pub async fn create(&self, payload: CustomerPayload) -> Result<Customer> {
        let new = validate_create(payload, self.store).await?;
        Ok(self.store.insert(new).await?)
    }

    /// Fetch a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no such record exists.
    pub async fn get(&self, id: CustomerId) -> Result<Customer> {
        self.store.find(id).await?.ok_or(ApiError::NotFound)
    }

    /// Full update: every field must be present in the payload.
    ///
    /// # Errors
    ///
    /// `ApiError::NotFound` if the record does not exist,
    /// `ApiError::Validation` for payload failures.
    pub async fn replace(&self, id: CustomerId, payload: CustomerPayload) -> Result<Customer> {
        self.apply_update(id, payload, false).await
    }

    /// Partial update: only supplied fields are validated and overwritten.
    ///
    /// # Errors
    ///
    /// Same as [`CustomerService::replace`].
    pub async fn partial_update(
        &self,
        id: CustomerId,
        payload: CustomerPayload,
    ) -> Result<Customer> {
        self.apply_update(id, payload, true).await
    }

    async fn apply_update(
        &self,
        id: CustomerId,
        payload: CustomerPayload,
        partial: bool,
    ) -> Result<Customer> {
        let existing = self.store.find(id).await?.ok_or(ApiError::NotFound)?;
        let changes = validate_update(payload, &existing, partial, self.store).await?;

        // The record can vanish between the lookup and the update.
        self.store
            .update(id, changes)
            .await?
            .ok_or(ApiError::NotFound)
    }

    /// Delete a customer.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no such record exists.
    pub async fn remove(&self, id: CustomerId) -> Result<()> {
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(ApiError::NotFound)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryCustomerStore;

    fn payload(name: &str, email: &str) -> CustomerPayload {
        CustomerPayload {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            mobile: Some("+1234567890".to_string()),
            address: Some("1 Lane".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_then_patch_scenario() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store, 10);

        let created = service.create(payload("Ada", "ada@x.com")).await.unwrap();

        let patch = CustomerPayload {
            name: Some("Ada L".to_string()),
            ..CustomerPayload::default()
        };
        let updated = service.partial_update(created.id, patch).await.unwrap();

        assert_eq!(updated.name, "Ada L");
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_get_and_delete_missing() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store, 10);
        let id = CustomerId::generate();

        assert!(matches!(
            service.get(id).await.unwrap_err(),
            ApiError::NotFound
        ));
        assert!(matches!(
            service.remove(id).await.unwrap_err(),
            ApiError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store, 10);

        let created = service.create(payload("Ada", "ada@x.com")).await.unwrap();
        service.remove(created.id).await.unwrap();

        assert!(matches!(
            service.get(created.id).await.unwrap_err(),
            ApiError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_list_pagination_and_search() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store, 2);

        for i in 0..5 {
            service
                .create(payload(&format!("Customer {i}"), &format!("c{i}@x.com")))
                .await
                .unwrap();
        }

        let first = service.list(None, 1).await.unwrap();
        assert_eq!(first.count, 5);
        assert_eq!(first.results.len(), 2);
        assert_eq!(first.next, Some(2));

        // Insertion order is preserved across pages.
        assert_eq!(first.results[0].name, "Customer 0");
        let last = service.list(None, 3).await.unwrap();
        assert_eq!(last.results.len(), 1);
        assert_eq!(last.results[0].name, "Customer 4");

        let searched = service.list(Some("c3@"), 1).await.unwrap();
        assert_eq!(searched.count, 1);
        assert_eq!(searched.results[0].name, "Customer 3");
    }

    #[tokio::test]
    async fn test_replace_requires_full_payload() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store, 10);
        let created = service.create(payload("Ada", "ada@x.com")).await.unwrap();

        let sparse = CustomerPayload {
            name: Some("Ada L".to_string()),
            ..CustomerPayload::default()
        };
        assert!(matches!(
            service.replace(created.id, sparse).await.unwrap_err(),
            ApiError::Validation(_)
        ));
    }
}
