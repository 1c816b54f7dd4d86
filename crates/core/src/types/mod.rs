//! Core types for the customer registry.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod shared_key;

pub use email::{Email, EmailError};
pub use id::*;
pub use shared_key::{SharedKey, SharedKeyError};
