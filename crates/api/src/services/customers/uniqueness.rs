//! Email and shared-key uniqueness checks.

use customer_registry_core::CustomerId;

use super::CustomerError;
use crate::db::CustomerStore;
use crate::models::CustomerDetails;

/// Rejects a candidate whose email or shared key belongs to another customer.
///
/// A match on the candidate's own ID is not a conflict, which is what lets
/// an update resend its unchanged email and shared key.
pub struct UniquenessGuard<'a> {
    store: &'a dyn CustomerStore,
}

impl<'a> UniquenessGuard<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn CustomerStore) -> Self {
        Self { store }
    }

    /// Check email first, then shared key; the first collision is reported.
    ///
    /// `id` is `None` for a create, in which case any match is a conflict.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::DuplicateEmail` or
    /// `CustomerError::DuplicateSharedKey` on a collision, and
    /// `CustomerError::Repository` if a lookup fails.
    pub async fn check(
        &self,
        id: Option<CustomerId>,
        details: &CustomerDetails,
    ) -> Result<(), CustomerError> {
        if let Some(existing) = self.store.find_by_email(&details.email).await?
            && Some(existing.id) != id
        {
            tracing::warn!(
                email = %details.email,
                existing_id = %existing.id,
                "Email already belongs to another customer"
            );
            return Err(CustomerError::DuplicateEmail(details.email.to_string()));
        }

        if let Some(existing) = self.store.find_by_shared_key(&details.shared_key).await?
            && Some(existing.id) != id
        {
            tracing::warn!(
                shared_key = %details.shared_key,
                existing_id = %existing.id,
                "Shared key already belongs to another customer"
            );
            return Err(CustomerError::DuplicateSharedKey(
                details.shared_key.to_string(),
            ));
        }

        Ok(())
    }
}
