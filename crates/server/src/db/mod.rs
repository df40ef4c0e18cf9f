//! Database access for the employee management MySQL store.
//!
//! # Database: `employees_db`
//!
//! ## Tables
//!
//! - `admin` - Admin login credentials (unique email)
//! - `category` - Employee categories
//! - `employee` - Employee records, `category_id` references `category`
//!
//! # Bootstrap
//!
//! There are no migration files. The tables are created with
//! `CREATE TABLE IF NOT EXISTS` by [`schema::SchemaInitializer`] every time
//! the process starts, which also re-seeds the admin credential.

pub mod admin;
pub mod categories;
pub mod employees;
pub mod schema;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{ConnectOptions, Connection, MySqlPool};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::DatabaseConfig;

pub use admin::{AdminRepository, SeedOutcome};
pub use categories::CategoryRepository;
pub use employees::EmployeeRepository;
pub use schema::{
    InitError, InitOptions, InitReport, SchemaInitializer, SchemaPlan, Step, StepOutcome,
};

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// A foreign key points at a row that does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

/// Convert an `AUTO_INCREMENT` value into an `INT` key.
fn generated_id(last_insert_id: u64) -> Result<i32, RepositoryError> {
    i32::try_from(last_insert_id).map_err(|_| {
        RepositoryError::DataCorruption(format!("generated id {last_insert_id} exceeds INT range"))
    })
}

/// Connection options for the server itself, without a default database.
#[must_use]
pub fn connect_options(config: &DatabaseConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(config.password.expose_secret())
}

/// Create a MySQL connection pool bound to `database`.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &DatabaseConfig, database: &str) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(1)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_with(connect_options(config).database(database))
        .await
}

/// Owned handle to the initialized database.
///
/// Created once at startup by [`Database::connect_and_initialize`] and
/// released with [`Database::close`]. Clones share the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: MySqlPool,
    name: String,
}

impl Database {
    /// Bootstrap the schema, then open the pool against it.
    ///
    /// The bootstrap runs on its own connection, which is closed before the
    /// pool is opened.
    ///
    /// # Errors
    ///
    /// Returns `InitError::Connection` if the server cannot be reached and
    /// the first failing step's error otherwise.
    pub async fn connect_and_initialize(
        config: &DatabaseConfig,
        initializer: &SchemaInitializer,
    ) -> Result<(Self, InitReport), InitError> {
        let endpoint = format!("{}:{}", config.host, config.port);
        let connection_error = |source: sqlx::Error| {
            error!(%endpoint, error = %source, "connection error");
            InitError::Connection {
                endpoint: endpoint.clone(),
                source,
            }
        };

        info!(%endpoint, user = %config.user, "Connecting to MySQL");
        let mut conn = connect_options(config)
            .connect()
            .await
            .map_err(connection_error)?;
        info!("Connected");

        let result = initializer.run(&mut conn).await;
        if let Err(e) = conn.close().await {
            warn!(error = %e, "Failed to close bootstrap connection");
        }
        let report = result?;

        let pool = create_pool(config, &report.database)
            .await
            .map_err(connection_error)?;
        info!(database = %report.database, "Database pool created");

        Ok((
            Self {
                pool,
                name: report.database.clone(),
            },
            report,
        ))
    }

    #[must_use]
    pub const fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Name of the database the pool is bound to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the pool can still reach the database.
    pub async fn is_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// `table.column` entries the live schema lacks.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if `information_schema` cannot be read.
    pub async fn missing_columns(&self) -> Result<Vec<String>, sqlx::Error> {
        let shapes = schema::inspect(&self.pool, &self.name).await?;
        Ok(schema::missing_columns(&shapes))
    }

    /// Close every pooled connection, waiting for checked-out ones.
    pub async fn close(self) {
        self.pool.close().await;
        info!(database = %self.name, "Database pool closed");
    }
}
