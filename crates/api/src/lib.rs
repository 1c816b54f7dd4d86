//! Customer registry service library.
//!
//! Validates customer records, keeps emails and shared keys unique, and
//! serves the records over HTTP. The binary in `main.rs` wires this up
//! with Sentry; tests build the router directly via [`routes::router`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
