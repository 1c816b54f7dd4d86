//! Customer service error types.

use thiserror::Error;

use customer_registry_core::CustomerId;

use super::validation::Violations;
use crate::db::{RepositoryError, UniqueField};

/// Errors that can occur during customer operations.
///
/// Everything except [`CustomerError::Repository`] is a rejected write at
/// conflict severity: terminal, not retried, and nothing was written.
#[derive(Debug, Error)]
pub enum CustomerError {
    /// One or more field rules failed; the message joins all of them.
    #[error("{0}")]
    Validation(Violations),

    /// Email belongs to a different customer.
    #[error("a customer with email {0} already exists")]
    DuplicateEmail(String),

    /// Shared key belongs to a different customer.
    #[error("a customer with shared key {0} already exists")]
    DuplicateSharedKey(String),

    /// Update targets an ID with no stored record (or carries no ID).
    #[error("customer record not found")]
    NotFound(Option<CustomerId>),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl CustomerError {
    /// Whether this is a client-side conflict rather than a server failure.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        !matches!(self, Self::Repository(_))
    }
}

impl From<RepositoryError> for CustomerError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate {
                field: UniqueField::Email,
                value,
            } => Self::DuplicateEmail(value),
            RepositoryError::Duplicate {
                field: UniqueField::SharedKey,
                value,
            } => Self::DuplicateSharedKey(value),
            other => Self::Repository(other),
        }
    }
}
