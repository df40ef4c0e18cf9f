//! Integration tests for the employee database bootstrap.
//!
//! # Running Tests
//!
//! ```bash
//! # Start a throwaway MySQL server
//! docker run --rm -d -p 3306:3306 -e MYSQL_ROOT_PASSWORD=root mysql:8
//!
//! # Run the ignored live-database tests
//! TEST_DATABASE_ENDPOINT=127.0.0.1 TEST_DATABASE_USER=root TEST_DATABASE_PASSWORD=root \
//!     cargo test -p employees-integration-tests -- --ignored
//! ```
//!
//! Every test creates its own database (`employees_db_test_<uuid>`) and drops
//! it afterwards, so tests can run in parallel against one server.

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use secrecy::SecretString;
use sqlx::{ConnectOptions, Connection, Executor, MySqlConnection};

use employees_server::config::DatabaseConfig;
use employees_server::db::{self, Database, InitOptions, InitReport, SchemaInitializer, SchemaPlan};

/// Server settings for the live tests, from `TEST_DATABASE_*` variables.
#[must_use]
pub fn test_config() -> DatabaseConfig {
    let _ = dotenvy::dotenv();

    let var = |key: &str| std::env::var(key).unwrap_or_else(|_| panic!("{key} must be set"));
    let mut config = DatabaseConfig::new(
        var("TEST_DATABASE_ENDPOINT"),
        var("TEST_DATABASE_USER"),
        SecretString::from(var("TEST_DATABASE_PASSWORD")),
    );
    if let Ok(port) = std::env::var("TEST_DATABASE_PORT") {
        config.port = port.parse().expect("TEST_DATABASE_PORT must be a port number");
    }
    config
}

/// A uniquely named database on the test server.
pub struct TestDatabase {
    pub config: DatabaseConfig,
    pub name: String,
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: test_config(),
            name: format!("employees_db_test_{}", uuid::Uuid::new_v4().simple()),
        }
    }

    /// Bootstrap options targeting this database with the standard seed.
    #[must_use]
    pub fn options(&self) -> InitOptions {
        InitOptions::for_database(&self.name)
    }

    /// Run the standard bootstrap.
    pub async fn initialize(&self) -> (Database, InitReport) {
        self.initialize_with(SchemaInitializer::new(self.options())).await
    }

    /// Run the standard bootstrap without the admin seed step.
    pub async fn initialize_unseeded(&self) -> (Database, InitReport) {
        let plan = SchemaPlan::new(
            db::schema::STANDARD_ORDER
                .into_iter()
                .filter(|step| *step != db::Step::SeedAdmin),
        )
        .expect("standard order without seeding is a valid plan");
        self.initialize_with(SchemaInitializer::new(self.options()).with_plan(plan))
            .await
    }

    pub async fn initialize_with(&self, initializer: SchemaInitializer) -> (Database, InitReport) {
        Database::connect_and_initialize(&self.config, &initializer)
            .await
            .expect("bootstrap should succeed")
    }

    /// A raw connection with no default database.
    pub async fn server_connection(&self) -> MySqlConnection {
        db::connect_options(&self.config)
            .connect()
            .await
            .expect("should connect to test server")
    }

    /// Drop the database.
    pub async fn drop_database(self) {
        let mut conn = self.server_connection().await;
        conn.execute(format!("DROP DATABASE IF EXISTS `{}`", self.name).as_str())
            .await
            .expect("should drop test database");
        conn.close().await.expect("should close connection");
    }
}
