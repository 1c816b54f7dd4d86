//! Bulk customer import from YAML.
//!
//! The file holds a list of records in the same shape as the HTTP API
//! bodies:
//!
//! ```yaml
//! - sharedKey: K1
//!   name: Ann
//!   phone: "555"
//!   email: ann@example.com
//!   periodStart: 2026-01-01
//!   periodEnd: 2026-12-31
//! ```
//!
//! Every record goes through the same validation and uniqueness rules as
//! `POST /customers`.

use std::path::Path;

use customer_registry_api::config::{ConfigError, get_database_url};
use customer_registry_api::db::{self, CustomerStore, PgCustomerStore};
use customer_registry_api::models::CustomerPayload;
use customer_registry_api::services::customers::{CustomerError, CustomerService};
use thiserror::Error;

/// Errors that can stop an import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read import file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid import file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record {index} rejected: {source}")]
    Rejected {
        index: usize,
        #[source]
        source: CustomerError,
    },
}

/// Outcome of an import run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub rejected: usize,
}

/// Import customers from `path` into the configured database.
///
/// # Errors
///
/// Returns `ImportError` if the file cannot be read or parsed, the database
/// is unreachable, or (without `keep_going`) a record is rejected.
pub async fn run(path: &Path, keep_going: bool) -> Result<ImportSummary, ImportError> {
    dotenvy::dotenv().ok();

    tracing::info!(path = %path.display(), "Loading customers from file");
    let content = tokio::fs::read_to_string(path).await?;
    let records = parse_records(&content)?;
    tracing::info!(records = records.len(), "Parsed import file");

    let database_url = get_database_url("REGISTRY_DATABASE_URL")?;
    let pool = db::create_pool(&database_url).await?;
    let store = PgCustomerStore::new(pool);

    import_records(&store, &records, keep_going).await
}

/// Parse a YAML list of customer records.
fn parse_records(content: &str) -> Result<Vec<CustomerPayload>, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

/// Create each record in order.
async fn import_records(
    store: &dyn CustomerStore,
    records: &[CustomerPayload],
    keep_going: bool,
) -> Result<ImportSummary, ImportError> {
    let service = CustomerService::new(store);
    let mut summary = ImportSummary::default();

    for (index, record) in records.iter().enumerate() {
        match service.create(record).await {
            Ok(customer) => {
                tracing::info!(index, id = %customer.id, "Imported customer");
                summary.created += 1;
            }
            // Store failures always abort
            Err(source) if keep_going && source.is_conflict() => {
                tracing::warn!(index, error = %source, "Skipping rejected record");
                summary.rejected += 1;
            }
            Err(source) => return Err(ImportError::Rejected { index, source }),
        }
    }

    Ok(summary)
}
