//! Customer Registry Core - Shared types library.
//!
//! This crate provides the domain types used across all customer registry
//! components:
//! - `api` - HTTP service exposing customer lookups and writes
//! - `cli` - Command-line tools for migrations and bulk import
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for customer IDs, emails, and shared keys

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
