//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! registry-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `REGISTRY_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! Migrations live in `crates/api/migrations/`.

use customer_registry_api::config::{ConfigError, get_database_url};
use customer_registry_api::db;
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run the registry database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the URL is missing, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = get_database_url("REGISTRY_DATABASE_URL")?;

    tracing::info!("Connecting to registry database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running registry migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Registry migrations complete");
    Ok(())
}
