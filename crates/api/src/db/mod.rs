//! Customer storage.
//!
//! # Backends
//!
//! - [`PgCustomerStore`] - `PostgreSQL` table `registry.customer`
//! - [`MemoryCustomerStore`] - process-local map, used for tests and for
//!   running the service without a database (`REGISTRY_STORE=memory`)
//!
//! Both backends enforce email and shared-key uniqueness atomically with the
//! write and report a collision as [`RepositoryError::Duplicate`].
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p customer-registry-cli -- migrate
//! ```

pub mod customers;
pub mod memory;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use customer_registry_core::{CustomerId, Email, SharedKey};

use crate::models::{Customer, CustomerDetails};

pub use customers::PgCustomerStore;
pub use memory::MemoryCustomerStore;

/// Customer column that carries a uniqueness rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    SharedKey,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("email"),
            Self::SharedKey => f.write_str("shared key"),
        }
    }
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation on email or shared key.
    #[error("{field} already exists: {value}")]
    Duplicate {
        /// Column whose uniqueness rule was violated.
        field: UniqueField,
        /// The colliding value.
        value: String,
    },
}

/// Persistence contract for customer records.
///
/// Lookups return `Ok(None)` when nothing matches; absence is not an error.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// All customers, ordered by ID.
    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError>;

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError>;

    async fn find_by_shared_key(
        &self,
        key: &SharedKey,
    ) -> Result<Option<Customer>, RepositoryError>;

    /// Insert (`id` is `None`) or overwrite in place (`id` is `Some`).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when updating an ID with no row.
    /// Returns `RepositoryError::Duplicate` when the write would break a
    /// uniqueness rule.
    async fn save(
        &self,
        id: Option<CustomerId>,
        details: &CustomerDetails,
    ) -> Result<Customer, RepositoryError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
