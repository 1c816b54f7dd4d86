//! Business logic services.
//!
//! # Services
//!
//! - `customers` - Customer validation, uniqueness, and writes

pub mod customers;
