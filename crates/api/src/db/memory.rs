//! In-process customer store.
//!
//! Holds every record behind a single `RwLock`. Uniqueness is re-checked
//! inside `save` while the write lock is held, so concurrent writers cannot
//! both commit the same email or shared key.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use customer_registry_core::{CustomerId, Email, SharedKey};

use super::{CustomerStore, RepositoryError, UniqueField};
use crate::models::{Customer, CustomerDetails};

#[derive(Debug, Default)]
struct Inner {
    last_id: i32,
    rows: BTreeMap<CustomerId, CustomerDetails>,
}

impl Inner {
    fn find(&self, predicate: impl Fn(&CustomerDetails) -> bool) -> Option<Customer> {
        self.rows
            .iter()
            .find(|(_, details)| predicate(details))
            .map(|(id, details)| Customer {
                id: *id,
                details: details.clone(),
            })
    }

    /// Rows other than `id` (all rows when `id` is `None`).
    fn others(&self, id: Option<CustomerId>) -> impl Iterator<Item = &CustomerDetails> {
        self.rows
            .iter()
            .filter(move |(existing_id, _)| Some(**existing_id) != id)
            .map(|(_, existing)| existing)
    }

    /// Reject a write whose email or shared key belongs to another row.
    /// Email is checked across all rows before the shared key.
    fn check_unique(
        &self,
        id: Option<CustomerId>,
        details: &CustomerDetails,
    ) -> Result<(), RepositoryError> {
        if self
            .others(id)
            .any(|existing| existing.email == details.email)
        {
            return Err(RepositoryError::Duplicate {
                field: UniqueField::Email,
                value: details.email.to_string(),
            });
        }
        if self
            .others(id)
            .any(|existing| existing.shared_key == details.shared_key)
        {
            return Err(RepositoryError::Duplicate {
                field: UniqueField::SharedKey,
                value: details.shared_key.to_string(),
            });
        }
        Ok(())
    }
}

/// Customer store kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryCustomerStore {
    inner: RwLock<Inner>,
}

impl MemoryCustomerStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored customers.
    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    /// Whether the store holds no customers.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.rows.is_empty()
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .iter()
            .map(|(id, details)| Customer {
                id: *id,
                details: details.clone(),
            })
            .collect())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).map(|details| Customer {
            id,
            details: details.clone(),
        }))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.inner.read().await.find(|d| &d.email == email))
    }

    async fn find_by_shared_key(
        &self,
        key: &SharedKey,
    ) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.inner.read().await.find(|d| &d.shared_key == key))
    }

    async fn save(
        &self,
        id: Option<CustomerId>,
        details: &CustomerDetails,
    ) -> Result<Customer, RepositoryError> {
        let mut inner = self.inner.write().await;
        inner.check_unique(id, details)?;

        let id = match id {
            Some(id) if inner.rows.contains_key(&id) => id,
            Some(_) => return Err(RepositoryError::NotFound),
            None => {
                inner.last_id += 1;
                CustomerId::new(inner.last_id)
            }
        };

        inner.rows.insert(id, details.clone());

        Ok(Customer {
            id,
            details: details.clone(),
        })
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
