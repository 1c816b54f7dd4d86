//! `PostgreSQL` customer store.
//!
//! Queries are checked at runtime (`query_as`) so the crate builds without
//! a live database.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use customer_registry_core::{CustomerId, Email, SharedKey};

use super::{CustomerStore, RepositoryError, UniqueField};
use crate::models::{Customer, CustomerDetails};

const EMAIL_CONSTRAINT: &str = "customer_email_key";
const SHARED_KEY_CONSTRAINT: &str = "customer_shared_key_key";

const SELECT_COLUMNS: &str = "id, shared_key, name, phone, email, period_start, period_end";

/// Row shape of `registry.customer`.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: CustomerId,
    shared_key: SharedKey,
    name: String,
    phone: String,
    email: Email,
    period_start: NaiveDate,
    period_end: NaiveDate,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            details: CustomerDetails {
                shared_key: row.shared_key,
                name: row.name,
                phone: row.phone,
                email: row.email,
                period_start: row.period_start,
                period_end: row.period_end,
            },
        }
    }
}

/// Customer store backed by a `PostgreSQL` pool.
#[derive(Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    /// Create a new store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        column: &str,
        value: &str,
    ) -> Result<Option<Customer>, RepositoryError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM registry.customer WHERE {column} = $1");
        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Customer::from))
    }

    async fn insert(&self, details: &CustomerDetails) -> Result<Customer, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO registry.customer
                (shared_key, name, phone, email, period_start, period_end)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SELECT_COLUMNS}
            "
        );

        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(&details.shared_key)
            .bind(&details.name)
            .bind(&details.phone)
            .bind(&details.email)
            .bind(details.period_start)
            .bind(details.period_end)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, details))?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: CustomerId,
        details: &CustomerDetails,
    ) -> Result<Customer, RepositoryError> {
        let sql = format!(
            r"
            UPDATE registry.customer
            SET shared_key = $1, name = $2, phone = $3, email = $4,
                period_start = $5, period_end = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING {SELECT_COLUMNS}
            "
        );

        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(&details.shared_key)
            .bind(&details.name)
            .bind(&details.phone)
            .bind(&details.email)
            .bind(details.period_start)
            .bind(details.period_end)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_write_error(e, details))?;

        row.map(Customer::from).ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM registry.customer ORDER BY id ASC");
        let rows = sqlx::query_as::<_, CustomerRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM registry.customer WHERE id = $1");
        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Customer::from))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Customer>, RepositoryError> {
        self.fetch_one_where("email", email.as_str()).await
    }

    async fn find_by_shared_key(
        &self,
        key: &SharedKey,
    ) -> Result<Option<Customer>, RepositoryError> {
        self.fetch_one_where("shared_key", key.as_str()).await
    }

    async fn save(
        &self,
        id: Option<CustomerId>,
        details: &CustomerDetails,
    ) -> Result<Customer, RepositoryError> {
        match id {
            Some(id) => self.update(id, details).await,
            None => self.insert(details).await,
        }
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Translate unique violations on the two customer constraints.
fn map_write_error(e: sqlx::Error, details: &CustomerDetails) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        match db_err.constraint() {
            Some(EMAIL_CONSTRAINT) => {
                return RepositoryError::Duplicate {
                    field: UniqueField::Email,
                    value: details.email.to_string(),
                };
            }
            Some(SHARED_KEY_CONSTRAINT) => {
                return RepositoryError::Duplicate {
                    field: UniqueField::SharedKey,
                    value: details.shared_key.to_string(),
                };
            }
            _ => {}
        }
    }
    RepositoryError::Database(e)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn details() -> CustomerDetails {
        CustomerDetails {
            shared_key: SharedKey::parse("K1").unwrap(),
            name: "Ann".to_owned(),
            phone: "555".to_owned(),
            email: Email::parse("a@x.com").unwrap(),
            period_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        }
    }

    #[test]
    fn test_non_database_error_is_not_a_duplicate() {
        let err = map_write_error(sqlx::Error::RowNotFound, &details());
        assert!(matches!(
            err,
            RepositoryError::Database(sqlx::Error::RowNotFound)
        ));
    }

    #[test]
    fn test_pool_timeout_is_not_a_duplicate() {
        let err = map_write_error(sqlx::Error::PoolTimedOut, &details());
        assert!(matches!(
            err,
            RepositoryError::Database(sqlx::Error::PoolTimedOut)
        ));
    }
}
