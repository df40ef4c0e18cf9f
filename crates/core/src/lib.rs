//! Employees Core - Shared types library.
//!
//! This crate provides the types shared by the schema bootstrap and the
//! application code that consumes the `employees_db` schema:
//! - `server` - Connection handle, schema initializer and repositories
//! - `integration-tests` - Live-database tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access.
//! Enable the `mysql` feature to get `sqlx` encode/decode impls.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
