//! Field rules for customer candidates.
//!
//! Rules run in a fixed order and every failure is collected, so a caller
//! sees all problems at once. A candidate that passes is turned into
//! [`CustomerDetails`] by the same pass.

use std::fmt;

use customer_registry_core::{Email, SharedKey};

use crate::models::{CustomerDetails, CustomerPayload};

/// A single failed field rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("name must not be empty")]
    NameRequired,
    #[error("phone must not be empty")]
    PhoneRequired,
    #[error("email must not be empty")]
    EmailRequired,
    #[error("email must be a well-formed email address")]
    EmailMalformed,
    #[error("shared key must not be empty")]
    SharedKeyRequired,
    #[error("period start is required")]
    PeriodStartRequired,
    #[error("period end is required")]
    PeriodEndRequired,
}

/// Every rule a candidate failed, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    #[must_use]
    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }
}

/// Messages joined with `"; "`.
impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Check a candidate and build the fields to store.
///
/// # Errors
///
/// Returns every failed rule if any rule fails.
pub fn validate(candidate: &CustomerPayload) -> Result<CustomerDetails, Violations> {
    let mut violations = Vec::new();

    let name = required_text(candidate.name.as_deref(), Violation::NameRequired, &mut violations);
    let phone = required_text(
        candidate.phone.as_deref(),
        Violation::PhoneRequired,
        &mut violations,
    );

    let email = match non_blank(candidate.email.as_deref()) {
        None => {
            violations.push(Violation::EmailRequired);
            None
        }
        Some(raw) => {
            if let Ok(email) = Email::parse(raw) {
                Some(email)
            } else {
                violations.push(Violation::EmailMalformed);
                None
            }
        }
    };

    let shared_key = match candidate.shared_key.as_deref().map(SharedKey::parse) {
        Some(Ok(key)) => Some(key),
        _ => {
            violations.push(Violation::SharedKeyRequired);
            None
        }
    };

    let period_start = candidate.period_start;
    if period_start.is_none() {
        violations.push(Violation::PeriodStartRequired);
    }
    let period_end = candidate.period_end;
    if period_end.is_none() {
        violations.push(Violation::PeriodEndRequired);
    }

    match (shared_key, name, phone, email, period_start, period_end) {
        (
            Some(shared_key),
            Some(name),
            Some(phone),
            Some(email),
            Some(period_start),
            Some(period_end),
        ) if violations.is_empty() => Ok(CustomerDetails {
            shared_key,
            name,
            phone,
            email,
            period_start,
            period_end,
        }),
        _ => Err(Violations(violations)),
    }
}

/// The failed rules for a candidate; empty means valid.
#[must_use]
pub fn violations(candidate: &CustomerPayload) -> Vec<Violation> {
    validate(candidate)
        .err()
        .map(Violations::into_vec)
        .unwrap_or_default()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn required_text(
    value: Option<&str>,
    violation: Violation,
    violations: &mut Vec<Violation>,
) -> Option<String> {
    let value = non_blank(value).map(str::to_owned);
    if value.is_none() {
        violations.push(violation);
    }
    value
}
