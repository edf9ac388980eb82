//! Customer payload validation.

use serde::Deserialize;

use clientele_core::{CustomerId, Email, EmailError, Mobile};

use crate::db::CustomerStore;
use crate::error::{ApiError, ValidationError};
use crate::models::{Customer, CustomerUpdate, NewCustomer};

/// Maximum length of a customer name.
pub const MAX_NAME_LENGTH: usize = 100;
/// Maximum length of a customer email.
pub const MAX_EMAIL_LENGTH: usize = 100;

/// Raw customer payload as decoded from a request body.
///
/// Every field is optional at the decoding layer; which ones are required
/// depends on the operation (create and PUT require all of them, PATCH
/// validates only what was supplied).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
}

/// Validate a create payload and assign the new record's ID.
///
/// # Errors
///
/// Returns a field-scoped [`ApiError::Validation`] on the first failing
/// field, or a repository error if the advisory uniqueness lookup fails.
pub async fn validate_create(
    payload: CustomerPayload,
    store: &dyn CustomerStore,
) -> Result<NewCustomer, ApiError> {
    let name = check_name(required("name", payload.name)?)?;
    let email = check_email(&required("email", payload.email)?)?;
    let mobile = check_mobile(&required("mobile", payload.mobile)?)?;
    let address = check_address(required("address", payload.address)?)?;

    check_email_unique(&email, None, store).await?;

    Ok(NewCustomer {
        id: CustomerId::generate(),
        name,
        email,
        mobile,
        address,
    })
}

/// Validate an update payload against the existing record.
///
/// With `partial` false (PUT) every field must be present; with `partial`
/// true (PATCH) only supplied fields are validated and overwritten. The
/// uniqueness check is skipped when the incoming email equals the record's
/// stored email (a no-op email update must never fail as a duplicate).
///
/// # Errors
///
/// Same as [`validate_create`].
pub async fn validate_update(
    payload: CustomerPayload,
    existing: &Customer,
    partial: bool,
    store: &dyn CustomerStore,
) -> Result<CustomerUpdate, ApiError> {
    let name = match (payload.name, partial) {
        (Some(name), _) => Some(check_name(name)?),
        (None, true) => None,
        (None, false) => return Err(ValidationError::required("name").into()),
    };

    let email = match (payload.email, partial) {
        (Some(email), _) => Some(check_email(&email)?),
        (None, true) => None,
        (None, false) => return Err(ValidationError::required("email").into()),
    };

    let mobile = match (payload.mobile, partial) {
        (Some(mobile), _) => Some(check_mobile(&mobile)?),
        (None, true) => None,
        (None, false) => return Err(ValidationError::required("mobile").into()),
    };

    let address = match (payload.address, partial) {
        (Some(address), _) => Some(check_address(address)?),
        (None, true) => None,
        (None, false) => return Err(ValidationError::required("address").into()),
    };

    let changes = CustomerUpdate {
        name,
        email,
        mobile,
        address,
    };

    if let Some(email) = &changes.email
        && *email != existing.email
    {
        check_email_unique(email, Some(existing.id), store).await?;
    }

    Ok(changes)
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    value.ok_or_else(|| ValidationError::required(field))
}

fn check_name(name: String) -> Result<String, ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::blank("name"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::too_long("name", MAX_NAME_LENGTH));
    }
    Ok(name)
}

fn check_email(email: &str) -> Result<Email, ValidationError> {
    Email::parse_with_limit(email, MAX_EMAIL_LENGTH).map_err(|e| match e {
        EmailError::Empty => ValidationError::blank("email"),
        EmailError::TooLong { max } => ValidationError::too_long("email", max),
        EmailError::Malformed => ValidationError::new("email", "Enter a valid email address."),
    })
}

fn check_mobile(mobile: &str) -> Result<Mobile, ValidationError> {
    Mobile::parse(mobile).map_err(|_| ValidationError::invalid_mobile())
}

fn check_address(address: String) -> Result<String, ValidationError> {
    if address.is_empty() {
        return Err(ValidationError::blank("address"));
    }
    Ok(address)
}

/// Advisory duplicate-email check. Read-only; the store's unique index has
/// the final word under races.
async fn check_email_unique(
    email: &Email,
    exclude: Option<CustomerId>,
    store: &dyn CustomerStore,
) -> Result<(), ApiError> {
    if store.email_exists(email, exclude).await? {
        return Err(ValidationError::duplicate_email().into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryCustomerStore;

    fn full_payload(email: &str) -> CustomerPayload {
        CustomerPayload {
            name: Some("Ada".to_string()),
            email: Some(email.to_string()),
            mobile: Some("+1234567890".to_string()),
            address: Some("1 Lane".to_string()),
        }
    }

    async fn seeded_store(email: &str) -> (MemoryCustomerStore, Customer) {
        let store = MemoryCustomerStore::new();
        let new = validate_create(full_payload(email), &store).await.unwrap();
        let customer = store.insert(new).await.unwrap();
        (store, customer)
    }

    #[tokio::test]
    async fn test_create_requires_all_fields() {
        let store = MemoryCustomerStore::new();
        let payload = CustomerPayload {
            name: Some("Ada".to_string()),
            ..CustomerPayload::default()
        };
        let err = validate_create(payload, &store).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(v) if v.field == "email" && v.reason == "This field is required."
        ));
    }

    #[tokio::test]
    async fn test_mobile_format_rules() {
        let store = MemoryCustomerStore::new();

        for bad in ["123", "12345678901234567", "+1 415 555"] {
            let mut payload = full_payload("ada@x.com");
            payload.mobile = Some(bad.to_string());
            let err = validate_create(payload, &store).await.unwrap_err();
            assert!(
                matches!(&err, ApiError::Validation(v) if v.field == "mobile"),
                "{bad} should be rejected"
            );
        }

        for good in ["+14155551234", "9876543210"] {
            let mut payload = full_payload(&format!("{good}@x.com"));
            payload.mobile = Some(good.to_string());
            assert!(
                validate_create(payload, &store).await.is_ok(),
                "{good} should be accepted"
            );
        }
    }

    #[tokio::test]
    async fn test_name_length_cap() {
        let store = MemoryCustomerStore::new();
        let mut payload = full_payload("ada@x.com");
        payload.name = Some("x".repeat(101));
        let err = validate_create(payload, &store).await.unwrap_err();
        assert!(matches!(&err, ApiError::Validation(v) if v.field == "name"));
    }

    #[tokio::test]
    async fn test_duplicate_email_on_create() {
        let (store, _) = seeded_store("ada@x.com").await;
        let err = validate_create(full_payload("ada@x.com"), &store)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Validation(v) if v.reason == "This email address is already in use."
        ));
    }

    #[tokio::test]
    async fn test_own_email_exempt_from_uniqueness() {
        let (store, customer) = seeded_store("ada@x.com").await;
        // Full update resubmitting the unchanged email must pass.
        let changes = validate_update(full_payload("ada@x.com"), &customer, false, &store)
            .await
            .unwrap();
        assert_eq!(changes.email.unwrap(), customer.email);
    }

    #[tokio::test]
    async fn test_other_customers_email_still_rejected() {
        let (store, customer) = seeded_store("ada@x.com").await;
        let new = validate_create(full_payload("grace@x.com"), &store)
            .await
            .unwrap();
        store.insert(new).await.unwrap();

        let err = validate_update(full_payload("grace@x.com"), &customer, false, &store)
            .await
            .unwrap_err();
        assert!(matches!(&err, ApiError::Validation(v) if v.field == "email"));
    }

    #[tokio::test]
    async fn test_partial_update_validates_only_supplied_fields() {
        let (store, customer) = seeded_store("ada@x.com").await;
        let payload = CustomerPayload {
            name: Some("Ada L".to_string()),
            ..CustomerPayload::default()
        };
        let changes = validate_update(payload, &customer, true, &store)
            .await
            .unwrap();
        assert_eq!(changes.name.as_deref(), Some("Ada L"));
        assert!(changes.email.is_none());
        assert!(changes.mobile.is_none());
        assert!(changes.address.is_none());
    }

    #[tokio::test]
    async fn test_full_update_requires_all_fields() {
        let (store, customer) = seeded_store("ada@x.com").await;
        let payload = CustomerPayload {
            name: Some("Ada L".to_string()),
            ..CustomerPayload::default()
        };
        let err = validate_update(payload, &customer, false, &store)
            .await
            .unwrap_err();
        assert!(matches!(&err, ApiError::Validation(v) if v.field == "email"));
    }

    #[tokio::test]
    async fn test_validation_does_not_mutate_store() {
        let (store, _) = seeded_store("ada@x.com").await;
        let _ = validate_create(full_payload("new@x.com"), &store).await;
        assert_eq!(store.list(None).await.unwrap().len(), 1);
    }
}
