//! In-memory store fakes.
//!
//! Drop-in [`CustomerStore`] / [`UserStore`] implementations for tests. The
//! whole state lives behind a `Mutex`, so the uniqueness check-and-insert is
//! atomic exactly like the unique indexes in Postgres: under concurrent
//! creates with the same email, exactly one wins and the rest get
//! [`RepositoryError::Conflict`]. A poisoned lock yields its inner state;
//! no operation leaves the data half-mutated across a panic.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use clientele_core::{CustomerId, Email, UserId};

use super::{CustomerStore, RepositoryError, UniqueViolation, UserStore};
use crate::models::{Customer, CustomerUpdate, NewCustomer, NewUser, UserAccount};

/// In-memory customer store. Records are kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryCustomerStore {
    records: Mutex<Vec<Customer>>,
}

impl MemoryCustomerStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Case-insensitive substring match used by the list search filter.
fn matches_search(customer: &Customer, term: &str) -> bool {
    let term = term.to_lowercase();
    customer.name.to_lowercase().contains(&term)
        || customer.email.as_str().to_lowercase().contains(&term)
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn list(&self, search: Option<&str>) -> Result<Vec<Customer>, RepositoryError> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(match search {
            Some(term) => records
                .iter()
                .filter(|c| matches_search(c, term))
                .cloned()
                .collect(),
            None => records.clone(),
        })
    }

    async fn find(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records.iter().find(|c| c.id == id).cloned())
    }

    async fn email_exists(
        &self,
        email: &Email,
        exclude: Option<CustomerId>,
    ) -> Result<bool, RepositoryError> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records
            .iter()
            .any(|c| c.email == *email && Some(c.id) != exclude))
    }

    async fn insert(&self, new: NewCustomer) -> Result<Customer, RepositoryError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);

        if records.iter().any(|c| c.email == new.email) {
            return Err(RepositoryError::Conflict(UniqueViolation::CustomerEmail));
        }

        let now = Utc::now();
        let customer = Customer {
            id: new.id,
            name: new.name,
            email: new.email,
            mobile: new.mobile,
            address: new.address,
            created_at: now,
            updated_at: now,
        };
        records.push(customer.clone());
        Ok(customer)
    }

    async fn update(
        &self,
        id: CustomerId,
        changes: CustomerUpdate,
    ) -> Result<Option<Customer>, RepositoryError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(email) = &changes.email
            && records.iter().any(|c| c.email == *email && c.id != id)
        {
            return Err(RepositoryError::Conflict(UniqueViolation::CustomerEmail));
        }

        let Some(customer) = records.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            customer.name = name;
        }
        if let Some(email) = changes.email {
            customer.email = email;
        }
        if let Some(mobile) = changes.mobile {
            customer.mobile = mobile;
        }
        if let Some(address) = changes.address {
            customer.address = address;
        }
        customer.updated_at = Utc::now();

        Ok(Some(customer.clone()))
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let before = records.len();
        records.retain(|c| c.id != id);
        Ok(records.len() < before)
    }
}

/// In-memory user account store.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    inner: Mutex<UserTable>,
}

#[derive(Debug, Default)]
struct UserTable {
    next_id: i64,
    rows: Vec<(UserAccount, String)>,
}

impl MemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn username_exists(&self, username: &str) -> Result<bool, RepositoryError> {
        let table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(table.rows.iter().any(|(u, _)| u.username == username))
    }

    async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        let table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(table.rows.iter().any(|(u, _)| u.email == *email))
    }

    async fn insert(&self, new: NewUser) -> Result<UserAccount, RepositoryError> {
        let mut table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        if table.rows.iter().any(|(u, _)| u.username == new.username) {
            return Err(RepositoryError::Conflict(UniqueViolation::Username));
        }
        if table.rows.iter().any(|(u, _)| u.email == new.email) {
            return Err(RepositoryError::Conflict(UniqueViolation::AccountEmail));
        }

        table.next_id += 1;
        let account = UserAccount {
            id: UserId::new(table.next_id),
            username: new.username,
            email: new.email,
            created_at: Utc::now(),
        };
        table.rows.push((account.clone(), new.password_hash));
        Ok(account)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(UserAccount, String)>, RepositoryError> {
        let table = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(table
            .rows
            .iter()
            .find(|(u, _)| u.username == username)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use clientele_core::Mobile;

    use super::*;

    fn new_customer(email: &str) -> NewCustomer {
        NewCustomer {
            id: CustomerId::generate(),
            name: "Ada".to_string(),
            email: Email::parse(email).unwrap(),
            mobile: Mobile::parse("+1234567890").unwrap(),
            address: "1 Lane".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryCustomerStore::new();
        let created = store.insert(new_customer("ada@x.com")).await.unwrap();
        let found = store.find(created.id).await.unwrap().unwrap();
        assert_eq!(found.email.as_str(), "ada@x.com");
        assert_eq!(found.created_at, found.updated_at);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryCustomerStore::new();
        store.insert(new_customer("ada@x.com")).await.unwrap();
        let err = store.insert(new_customer("ada@x.com")).await.unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Conflict(UniqueViolation::CustomerEmail)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_creates_one_winner() {
        let store = Arc::new(MemoryCustomerStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.insert(new_customer("race@x.com")).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_conflicts_with_other_record() {
        let store = MemoryCustomerStore::new();
        let a = store.insert(new_customer("a@x.com")).await.unwrap();
        store.insert(new_customer("b@x.com")).await.unwrap();

        let changes = CustomerUpdate {
            email: Some(Email::parse("b@x.com").unwrap()),
            ..CustomerUpdate::default()
        };
        let err = store.update(a.id, changes).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_own_email_is_not_a_conflict() {
        let store = MemoryCustomerStore::new();
        let a = store.insert(new_customer("a@x.com")).await.unwrap();

        let changes = CustomerUpdate {
            email: Some(Email::parse("a@x.com").unwrap()),
            ..CustomerUpdate::default()
        };
        let updated = store.update(a.id, changes).await.unwrap().unwrap();
        assert_eq!(updated.email.as_str(), "a@x.com");
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let store = MemoryCustomerStore::new();
        let mut ada = new_customer("ada@x.com");
        ada.name = "Ada Lovelace".to_string();
        store.insert(ada).await.unwrap();
        store.insert(new_customer("grace@y.com")).await.unwrap();

        let by_name = store.list(Some("LOVE")).await.unwrap();
        assert_eq!(by_name.len(), 1);

        let by_email = store.list(Some("@y.com")).await.unwrap();
        assert_eq!(by_email.len(), 1);

        let none = store.list(Some("zzz")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_poisoned_lock_still_serves_reads_and_writes() {
        let store = Arc::new(MemoryCustomerStore::new());
        store.insert(new_customer("ada@x.com")).await.unwrap();

        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.records.lock().unwrap();
            panic!("poison the mutex");
        })
        .join();

        assert_eq!(store.list(None).await.unwrap().len(), 1);
        store.insert(new_customer("grace@x.com")).await.unwrap();
        assert_eq!(store.list(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let store = MemoryCustomerStore::new();
        assert!(!store.delete(CustomerId::generate()).await.unwrap());
    }

    #[tokio::test]
    async fn test_user_insert_distinguishes_conflicts() {
        let store = MemoryUserStore::new();
        store
            .insert(NewUser {
                username: "ada".to_string(),
                email: Email::parse("ada@x.com").unwrap(),
                password_hash: "h1".to_string(),
            })
            .await
            .unwrap();

        let err = store
            .insert(NewUser {
                username: "ada".to_string(),
                email: Email::parse("other@x.com").unwrap(),
                password_hash: "h2".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Conflict(UniqueViolation::Username)
        ));

        let err = store
            .insert(NewUser {
                username: "grace".to_string(),
                email: Email::parse("ada@x.com").unwrap(),
                password_hash: "h3".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Conflict(UniqueViolation::AccountEmail)
        ));

        // Nothing was created by the failed attempts.
        assert!(!store.username_exists("grace").await.unwrap());
    }
}
