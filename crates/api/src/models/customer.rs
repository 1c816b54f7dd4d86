//! Customer domain types and their wire representation.
//!
//! [`Customer`] is what the store holds. [`CustomerPayload`] is what callers
//! send and receive; every field is optional on the way in so that missing
//! fields surface as validation messages instead of JSON errors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use customer_registry_core::{CustomerId, Email, SharedKey};

/// Every mutable field of a customer.
///
/// Updates replace this struct wholesale, so there is no partial update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    /// Caller-supplied unique token.
    pub shared_key: SharedKey,
    /// Display name.
    pub name: String,
    /// Contact phone number (free-form).
    pub phone: String,
    /// Unique contact email.
    pub email: Email,
    /// First day of the validity window.
    pub period_start: NaiveDate,
    /// Last day of the validity window.
    pub period_end: NaiveDate,
}

/// A stored customer (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Store-assigned ID, immutable after insert.
    pub id: CustomerId,
    /// Mutable fields.
    pub details: CustomerDetails,
}

/// Customer as sent over the wire, in both directions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    /// Present on updates and on every response.
    #[serde(default)]
    pub id: Option<CustomerId>,
    #[serde(default)]
    pub shared_key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub period_start: Option<NaiveDate>,
    #[serde(default)]
    pub period_end: Option<NaiveDate>,
}

impl From<Customer> for CustomerPayload {
    fn from(customer: Customer) -> Self {
        let CustomerDetails {
            shared_key,
            name,
            phone,
            email,
            period_start,
            period_end,
        } = customer.details;

        Self {
            id: Some(customer.id),
            shared_key: Some(shared_key.into_inner()),
            name: Some(name),
            phone: Some(phone),
            email: Some(email.into_inner()),
            period_start: Some(period_start),
            period_end: Some(period_end),
        }
    }
}
