//! Shared key type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`SharedKey`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedKeyError {
    /// The input is empty or only whitespace.
    #[error("shared key cannot be blank")]
    Blank,
}

/// A caller-supplied token that identifies a customer.
///
/// Unlike [`CustomerId`](crate::CustomerId), which the store assigns, the
/// shared key comes from the caller and must be unique across customers.
/// The value is kept exactly as given; only blank input is rejected.
///
/// ```
/// use customer_registry_core::SharedKey;
///
/// assert!(SharedKey::parse("jgutierrez").is_ok());
/// assert!(SharedKey::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SharedKey(String);

impl SharedKey {
    /// Parse a `SharedKey` from a string.
    ///
    /// # Errors
    ///
    /// Returns `SharedKeyError::Blank` if the input is empty after trimming.
    pub fn parse(s: &str) -> Result<Self, SharedKeyError> {
        if s.trim().is_empty() {
            return Err(SharedKeyError::Blank);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `SharedKey` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SharedKey {
    type Err = SharedKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for SharedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for SharedKey {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for SharedKey {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for SharedKey {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
