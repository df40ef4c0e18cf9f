//! Employee management database library.
//!
//! Bootstraps the `employees_db` MySQL schema (`admin`, `category`,
//! `employee`), seeds the admin credential, and hands an owned connection
//! handle to the rest of the application.
//!
//! # Usage
//!
//! ```rust,no_run
//! use employees_server::config::ServerConfig;
//! use employees_server::db::{Database, InitOptions, SchemaInitializer};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let initializer = SchemaInitializer::new(InitOptions::default());
//! let (database, report) = Database::connect_and_initialize(&config.database, &initializer).await?;
//! tracing::info!(seed = ?report.seed_outcome(), "schema ready");
//! database.close().await;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod state;
