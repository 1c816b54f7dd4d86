//! Customer service.
//!
//! Every write runs field validation and then the uniqueness guard before
//! anything is persisted. The service keeps no state between calls; each
//! operation reads from the store again.

mod error;
mod uniqueness;
pub mod validation;

pub use error::CustomerError;
pub use uniqueness::UniquenessGuard;
pub use validation::{Violation, Violations, validate, violations};

use customer_registry_core::{CustomerId, Email, SharedKey};

use crate::db::{CustomerStore, RepositoryError};
use crate::models::{Customer, CustomerDetails, CustomerPayload};

/// Customer service.
///
/// Handles listing, lookups, creation, and full-overwrite updates.
pub struct CustomerService<'a> {
    store: &'a dyn CustomerStore,
}

impl<'a> CustomerService<'a> {
    /// Create a new customer service over a store.
    #[must_use]
    pub const fn new(store: &'a dyn CustomerStore) -> Self {
        Self { store }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Every stored customer, unfiltered.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::Repository` if the store fails.
    pub async fn list_all(&self) -> Result<Vec<Customer>, CustomerError> {
        tracing::debug!("Listing customers");
        Ok(self.store.find_all().await?)
    }

    /// Find a customer by shared key. Absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::Repository` if the store fails.
    pub async fn find_by_shared_key(&self, key: &str) -> Result<Option<Customer>, CustomerError> {
        tracing::debug!(shared_key = %key, "Looking up customer by shared key");
        // A blank key can never have been stored
        let Ok(key) = SharedKey::parse(key) else {
            return Ok(None);
        };
        Ok(self.store.find_by_shared_key(&key).await?)
    }

    /// Find a customer by email. Absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::Repository` if the store fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, CustomerError> {
        tracing::debug!(email = %email, "Looking up customer by email");
        // A malformed email can never have been stored
        let Ok(email) = Email::parse(email) else {
            return Ok(None);
        };
        Ok(self.store.find_by_email(&email).await?)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Create a customer. Any `id` on the candidate is ignored.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::Validation` if a field rule fails.
    /// Returns `CustomerError::DuplicateEmail` or
    /// `CustomerError::DuplicateSharedKey` if either belongs to a customer.
    pub async fn create(&self, candidate: &CustomerPayload) -> Result<Customer, CustomerError> {
        tracing::info!(shared_key = ?candidate.shared_key, "Creating customer");

        let details = self.check(candidate, None).await?;
        let customer = self.store.save(None, &details).await?;

        tracing::info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    /// Overwrite every mutable field of an existing customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::Validation` if a field rule fails.
    /// Returns `CustomerError::DuplicateEmail` or
    /// `CustomerError::DuplicateSharedKey` if either belongs to another
    /// customer.
    /// Returns `CustomerError::NotFound` if the candidate has no `id` or the
    /// `id` is unknown.
    pub async fn update(&self, candidate: &CustomerPayload) -> Result<Customer, CustomerError> {
        tracing::info!(customer_id = ?candidate.id, "Updating customer");

        let details = self.check(candidate, candidate.id).await?;

        let Some(id) = candidate.id else {
            tracing::warn!("Update rejected: candidate has no id");
            return Err(CustomerError::NotFound(None));
        };

        let Some(mut customer) = self.store.find_by_id(id).await? else {
            tracing::warn!(customer_id = %id, "Update rejected: customer not found");
            return Err(CustomerError::NotFound(Some(id)));
        };

        customer.details = details;

        let updated = self
            .store
            .save(Some(customer.id), &customer.details)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CustomerError::NotFound(Some(id)),
                other => other.into(),
            })?;

        tracing::info!(customer_id = %updated.id, "Customer updated");
        Ok(updated)
    }

    /// Field rules, then uniqueness.
    async fn check(
        &self,
        candidate: &CustomerPayload,
        id: Option<CustomerId>,
    ) -> Result<CustomerDetails, CustomerError> {
        let details = validate(candidate).map_err(|violations| {
            tracing::warn!(%violations, "Customer rejected by field validation");
            CustomerError::Validation(violations)
        })?;

        UniquenessGuard::new(self.store).check(id, &details).await?;

        Ok(details)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::db::MemoryCustomerStore;

    /// Counts writes that reach the store.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryCustomerStore,
        saves: AtomicUsize,
    }

    #[async_trait]
    impl CustomerStore for CountingStore {
        async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
            self.inner.find_all().await
        }

        async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
            self.inner.find_by_email(email).await
        }

        async fn find_by_shared_key(
            &self,
            key: &SharedKey,
        ) -> Result<Option<Customer>, RepositoryError> {
            self.inner.find_by_shared_key(key).await
        }

        async fn save(
            &self,
            id: Option<CustomerId>,
            details: &CustomerDetails,
        ) -> Result<Customer, RepositoryError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save(id, details).await
        }

        async fn ping(&self) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    /// Lookups by email and shared key see nothing, as if a concurrent
    /// writer committed between the guard and the save.
    #[derive(Default)]
    struct StaleReadStore {
        inner: MemoryCustomerStore,
    }

    #[async_trait]
    impl CustomerStore for StaleReadStore {
        async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
            self.inner.find_all().await
        }

        async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_email(&self, _: &Email) -> Result<Option<Customer>, RepositoryError> {
            Ok(None)
        }

        async fn find_by_shared_key(
            &self,
            _: &SharedKey,
        ) -> Result<Option<Customer>, RepositoryError> {
            Ok(None)
        }

        async fn save(
            &self,
            id: Option<CustomerId>,
            details: &CustomerDetails,
        ) -> Result<Customer, RepositoryError> {
            self.inner.save(id, details).await
        }

        async fn ping(&self) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    fn candidate(key: &str, email: &str) -> CustomerPayload {
        CustomerPayload {
            id: None,
            shared_key: Some(key.to_owned()),
            name: Some("Ann".to_owned()),
            phone: Some("555".to_owned()),
            email: Some(email.to_owned()),
            period_start: NaiveDate::from_ymd_opt(2026, 1, 1),
            period_end: NaiveDate::from_ymd_opt(2026, 12, 31),
        }
    }

    #[tokio::test]
    async fn test_create_on_empty_store_assigns_id() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);

        let created = service.create(&candidate("K1", "a@x.com")).await.unwrap();

        assert_eq!(created.id, CustomerId::new(1));
        assert_eq!(created.details.name, "Ann");
        assert_eq!(service.list_all().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn test_create_ignores_candidate_id() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);
        let first = service.create(&candidate("K1", "a@x.com")).await.unwrap();

        let second = service
            .create(&CustomerPayload {
                id: Some(first.id),
                ..candidate("K2", "b@x.com")
            })
            .await
            .unwrap();

        assert_ne!(second.id, first.id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);
        service.create(&candidate("K1", "a@x.com")).await.unwrap();

        let err = service
            .create(&candidate("K2", "a@x.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, CustomerError::DuplicateEmail(ref e) if e == "a@x.com"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_duplicate_shared_key() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);
        service.create(&candidate("K1", "a@x.com")).await.unwrap();

        let err = service
            .create(&candidate("K1", "b@x.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, CustomerError::DuplicateSharedKey(ref k) if k == "K1"));
    }

    #[tokio::test]
    async fn test_create_with_empty_name_fails_validation() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);

        let err = service
            .create(&CustomerPayload {
                name: Some(String::new()),
                ..candidate("K1", "a@x.com")
            })
            .await
            .unwrap_err();

        match err {
            CustomerError::Validation(violations) => {
                assert_eq!(violations.as_slice(), &[Violation::NameRequired]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_validation_precedes_persistence() {
        let store = CountingStore::default();
        let service = CustomerService::new(&store);

        let _ = service.create(&CustomerPayload::default()).await;
        let _ = service
            .update(&CustomerPayload {
                id: Some(CustomerId::new(1)),
                email: Some("broken".to_owned()),
                ..candidate("K1", "a@x.com")
            })
            .await;

        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_with_own_email_and_key() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);
        let created = service.create(&candidate("K1", "a@x.com")).await.unwrap();

        let updated = service
            .update(&CustomerPayload {
                id: Some(created.id),
                name: Some("Anna".to_owned()),
                ..candidate("K1", "a@x.com")
            })
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.details.name, "Anna");
        let stored = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.details.name, "Anna");
    }

    #[tokio::test]
    async fn test_update_overwrites_every_field() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);
        let created = service.create(&candidate("K1", "a@x.com")).await.unwrap();

        let replacement = CustomerPayload {
            id: Some(created.id),
            shared_key: Some("K9".to_owned()),
            name: Some("Bea".to_owned()),
            phone: Some("777".to_owned()),
            email: Some("bea@y.org".to_owned()),
            period_start: NaiveDate::from_ymd_opt(2027, 2, 1),
            period_end: NaiveDate::from_ymd_opt(2027, 3, 1),
        };
        let updated = service.update(&replacement).await.unwrap();

        assert_eq!(CustomerPayload::from(updated), replacement);
        assert!(service.find_by_shared_key("K1").await.unwrap().is_none());
        assert!(service.find_by_email("a@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_twice_is_idempotent() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);
        let created = service.create(&candidate("K1", "a@x.com")).await.unwrap();
        let change = CustomerPayload {
            id: Some(created.id),
            phone: Some("999".to_owned()),
            ..candidate("K1", "a@x.com")
        };

        service.update(&change).await.unwrap();
        let once = service.list_all().await.unwrap();
        service.update(&change).await.unwrap();
        let twice = service.list_all().await.unwrap();

        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);

        let err = service
            .update(&CustomerPayload {
                id: Some(CustomerId::new(42)),
                ..candidate("K1", "a@x.com")
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CustomerError::NotFound(Some(id)) if id == CustomerId::new(42)));
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_update_without_id_is_not_found() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);

        let err = service
            .update(&candidate("K1", "a@x.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, CustomerError::NotFound(None)));
    }

    #[tokio::test]
    async fn test_update_taking_another_customers_email() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);
        let first = service.create(&candidate("K1", "a@x.com")).await.unwrap();
        service.create(&candidate("K2", "b@x.com")).await.unwrap();

        let err = service
            .update(&CustomerPayload {
                id: Some(first.id),
                ..candidate("K1", "b@x.com")
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CustomerError::DuplicateEmail(_)));
        let stored = store.find_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(stored.details.email.as_str(), "a@x.com");
    }

    #[tokio::test]
    async fn test_email_conflict_reported_before_shared_key_conflict() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);
        service.create(&candidate("K1", "a@x.com")).await.unwrap();
        service.create(&candidate("K2", "b@x.com")).await.unwrap();

        let err = service
            .create(&candidate("K1", "b@x.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, CustomerError::DuplicateEmail(ref e) if e == "b@x.com"));
    }

    #[tokio::test]
    async fn test_store_constraint_catches_what_the_guard_missed() {
        let store = StaleReadStore::default();
        let service = CustomerService::new(&store);
        service.create(&candidate("K1", "a@x.com")).await.unwrap();

        let err = service
            .create(&candidate("K2", "a@x.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, CustomerError::DuplicateEmail(_)));
        assert_eq!(store.inner.len().await, 1);
    }

    #[tokio::test]
    async fn test_uniqueness_holds_after_mixed_writes() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);

        let writes = [
            ("K1", "a@x.com"),
            ("K2", "b@x.com"),
            ("K1", "c@x.com"),
            ("K3", "a@x.com"),
            ("K3", "c@x.com"),
        ];
        for (key, email) in writes {
            let _ = service.create(&candidate(key, email)).await;
        }
        let first = service.find_by_shared_key("K1").await.unwrap().unwrap();
        let _ = service
            .update(&CustomerPayload {
                id: Some(first.id),
                ..candidate("K2", "a@x.com")
            })
            .await;

        let all = service.list_all().await.unwrap();
        assert_eq!(all.len(), 3);
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                assert_ne!(a.details.email, b.details.email);
                assert_ne!(a.details.shared_key, b.details.shared_key);
            }
        }
    }

    #[tokio::test]
    async fn test_find_by_email_absent() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);

        assert!(service.find_by_email("missing@x.com").await.unwrap().is_none());
        assert!(service.find_by_email("not an email").await.unwrap().is_none());
        assert!(service.find_by_shared_key("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_shared_key_and_email() {
        let store = MemoryCustomerStore::new();
        let service = CustomerService::new(&store);
        let created = service.create(&candidate("K1", "a@x.com")).await.unwrap();

        assert_eq!(
            service.find_by_shared_key("K1").await.unwrap(),
            Some(created.clone())
        );
        assert_eq!(service.find_by_email("a@x.com").await.unwrap(), Some(created));
    }
}
