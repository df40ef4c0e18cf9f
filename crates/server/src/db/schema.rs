//! Schema bootstrap for `employees_db`.
//!
//! The bootstrap is a fixed sequence of [`Step`]s run one after another on a
//! single connection. `USE` is connection state, so the steps cannot be
//! spread over a pool.
//!
//! Each step declares what it depends on. [`SchemaPlan`] refuses any order
//! where a step runs before one of its dependencies, which is how the
//! `employee -> category` foreign key is protected before any SQL is sent.

use std::fmt;

use sqlx::{Executor, MySqlConnection, MySqlPool};
use thiserror::Error;
use tracing::{error, info, warn};

use super::admin::{SeedOutcome, upsert_seed};
use crate::models::AdminSeed;

/// Name of the database the application runs against.
pub const DATABASE_NAME: &str = "employees_db";

const MAX_IDENTIFIER_LEN: usize = 64;

pub const ADMIN_TABLE_DDL: &str = r"
CREATE TABLE IF NOT EXISTS admin (
    id INT AUTO_INCREMENT PRIMARY KEY,
    email VARCHAR(100) UNIQUE,
    password VARCHAR(150)
) ENGINE=InnoDB
";

pub const CATEGORY_TABLE_DDL: &str = r"
CREATE TABLE IF NOT EXISTS category (
    id INT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(30)
) ENGINE=InnoDB
";

pub const EMPLOYEE_TABLE_DDL: &str = r"
CREATE TABLE IF NOT EXISTS employee (
    id INT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(30),
    email VARCHAR(30),
    password VARCHAR(150),
    salary INT,
    address VARCHAR(40),
    image VARCHAR(50),
    category_id INT,
    FOREIGN KEY (category_id) REFERENCES category(id)
) ENGINE=InnoDB
";

/// Columns every table must have once the bootstrap has run.
pub const EXPECTED_COLUMNS: &[(&str, &[&str])] = &[
    ("admin", &["id", "email", "password"]),
    ("category", &["id", "name"]),
    (
        "employee",
        &[
            "id",
            "name",
            "email",
            "password",
            "salary",
            "address",
            "image",
            "category_id",
        ],
    ),
];

// =============================================================================
// Steps and Plan
// =============================================================================

/// One bootstrap operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    EnsureDatabase,
    SelectDatabase,
    EnsureAdminTable,
    SeedAdmin,
    EnsureCategoryTable,
    EnsureEmployeeTable,
}

impl Step {
    /// Steps that must have completed before this one may run.
    #[must_use]
    pub const fn depends_on(self) -> &'static [Self] {
        match self {
            Self::EnsureDatabase => &[],
            Self::SelectDatabase => &[Self::EnsureDatabase],
            Self::EnsureAdminTable | Self::EnsureCategoryTable => &[Self::SelectDatabase],
            Self::SeedAdmin => &[Self::EnsureAdminTable],
            Self::EnsureEmployeeTable => &[Self::EnsureCategoryTable],
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnsureDatabase => "ensure database",
            Self::SelectDatabase => "select database",
            Self::EnsureAdminTable => "ensure admin table",
            Self::SeedAdmin => "seed admin",
            Self::EnsureCategoryTable => "ensure category table",
            Self::EnsureEmployeeTable => "ensure employee table",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The order the application bootstraps its schema in.
pub const STANDARD_ORDER: [Step; 6] = [
    Step::EnsureDatabase,
    Step::SelectDatabase,
    Step::EnsureAdminTable,
    Step::SeedAdmin,
    Step::EnsureCategoryTable,
    Step::EnsureEmployeeTable,
];

/// Errors from building a [`SchemaPlan`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("step '{0}' appears more than once")]
    DuplicateStep(Step),
    #[error("step '{step}' must run after '{dependency}'")]
    OutOfOrder { step: Step, dependency: Step },
}

/// An ordered list of steps in which every dependency runs first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaPlan {
    steps: Vec<Step>,
}

impl SchemaPlan {
    /// Build a plan from steps in execution order.
    ///
    /// A plan may be partial, but each step's dependencies must appear
    /// earlier in it.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::DuplicateStep` if a step repeats and
    /// `PlanError::OutOfOrder` if a step precedes (or lacks) a dependency.
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Result<Self, PlanError> {
        let mut planned: Vec<Step> = Vec::new();

        for step in steps {
            if planned.contains(&step) {
                return Err(PlanError::DuplicateStep(step));
            }
            if let Some(&dependency) = step.depends_on().iter().find(|d| !planned.contains(*d)) {
                return Err(PlanError::OutOfOrder { step, dependency });
            }
            planned.push(step);
        }

        Ok(Self { steps: planned })
    }

    /// The full six-step bootstrap.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            steps: STANDARD_ORDER.to_vec(),
        }
    }

    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

// =============================================================================
// Initializer
// =============================================================================

/// Errors that stop the bootstrap.
#[derive(Debug, Error)]
pub enum InitError {
    /// The store is unreachable or rejected the credentials.
    #[error("failed to connect to {endpoint}: {source}")]
    Connection {
        endpoint: String,
        #[source]
        source: sqlx::Error,
    },

    /// A DDL step failed.
    #[error("{step} failed: {source}")]
    Schema {
        step: Step,
        #[source]
        source: sqlx::Error,
    },

    /// The admin upsert failed.
    #[error("seeding admin {email} failed: {source}")]
    Seed {
        email: String,
        #[source]
        source: sqlx::Error,
    },

    /// The upsert reported an affected-row count it can never produce for
    /// a single row.
    #[error("admin upsert reported {0} affected rows")]
    UnexpectedAffectedRows(u64),

    #[error("invalid database name {0:?}: use 1-64 ASCII letters, digits or '_'")]
    InvalidDatabaseName(String),
}

/// What the bootstrap targets.
#[derive(Debug, Clone)]
pub struct InitOptions {
    pub database: String,
    pub seed: AdminSeed,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            database: DATABASE_NAME.to_owned(),
            seed: AdminSeed::standard(),
        }
    }
}

impl InitOptions {
    /// Target another database with the standard seed.
    #[must_use]
    pub fn for_database(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }
}

/// Result of a completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    Seeded(SeedOutcome),
}

/// Record of a successful bootstrap, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub database: String,
    pub steps: Vec<(Step, StepOutcome)>,
}

impl InitReport {
    /// Outcome of the admin upsert, if the plan included it.
    #[must_use]
    pub fn seed_outcome(&self) -> Option<SeedOutcome> {
        self.steps.iter().find_map(|(_, outcome)| match outcome {
            StepOutcome::Seeded(seed) => Some(*seed),
            StepOutcome::Done => None,
        })
    }

    pub fn completed(&self) -> impl Iterator<Item = Step> + '_ {
        self.steps.iter().map(|(step, _)| *step)
    }
}

/// Runs a [`SchemaPlan`] on one connection, stopping at the first failure.
#[derive(Debug, Clone)]
pub struct SchemaInitializer {
    options: InitOptions,
    plan: SchemaPlan,
}

impl SchemaInitializer {
    #[must_use]
    pub fn new(options: InitOptions) -> Self {
        Self {
            options,
            plan: SchemaPlan::standard(),
        }
    }

    #[must_use]
    pub fn with_plan(mut self, plan: SchemaPlan) -> Self {
        self.plan = plan;
        self
    }

    #[must_use]
    pub const fn options(&self) -> &InitOptions {
        &self.options
    }

    /// Run every step in order on `conn`.
    ///
    /// `conn` should be opened without a default database; the plan's
    /// `select database` step switches it.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error. Steps already completed are
    /// not rolled back.
    pub async fn run(&self, conn: &mut MySqlConnection) -> Result<InitReport, InitError> {
        validate_database_name(&self.options.database)?;

        let mut report = InitReport {
            database: self.options.database.clone(),
            steps: Vec::with_capacity(self.plan.steps().len()),
        };

        for &step in self.plan.steps() {
            let outcome = self.run_step(step, conn).await.inspect_err(|e| {
                error!(%step, database = %self.options.database, error = %e, "Schema bootstrap step failed");
            })?;
            report.steps.push((step, outcome));
        }

        Ok(report)
    }

    async fn run_step(
        &self,
        step: Step,
        conn: &mut MySqlConnection,
    ) -> Result<StepOutcome, InitError> {
        let database = &self.options.database;

        match step {
            Step::EnsureDatabase => {
                execute_ddl(conn, step, &format!("CREATE DATABASE IF NOT EXISTS `{database}`")).await?;
                info!("Database '{database}' is ready");
            }
            Step::SelectDatabase => {
                execute_ddl(conn, step, &format!("USE `{database}`")).await?;
                info!("Using database: {database}");
            }
            Step::EnsureAdminTable => {
                execute_ddl(conn, step, ADMIN_TABLE_DDL).await?;
                info!("Admin table ready");
            }
            Step::SeedAdmin => return self.seed_admin(conn).await,
            Step::EnsureCategoryTable => {
                execute_ddl(conn, step, CATEGORY_TABLE_DDL).await?;
                info!("Category table ready");
            }
            Step::EnsureEmployeeTable => {
                execute_ddl(conn, step, EMPLOYEE_TABLE_DDL).await?;
                info!("Employee table ready");
            }
        }

        Ok(StepOutcome::Done)
    }

    async fn seed_admin(&self, conn: &mut MySqlConnection) -> Result<StepOutcome, InitError> {
        let seed = &self.options.seed;
        let outcome = upsert_seed(&mut *conn, seed).await?;

        match outcome {
            SeedOutcome::Inserted => info!(email = %seed.email, "Inserted new admin"),
            SeedOutcome::Updated => info!(email = %seed.email, "Updated existing admin"),
            SeedOutcome::Unchanged => info!(email = %seed.email, "Admin already up to date"),
        }

        Ok(StepOutcome::Seeded(outcome))
    }
}

/// DDL goes over the text protocol: `USE` cannot be prepared.
async fn execute_ddl(conn: &mut MySqlConnection, step: Step, sql: &str) -> Result<(), InitError> {
    Executor::execute(&mut *conn, sql)
        .await
        .map(|_| ())
        .map_err(|source| InitError::Schema { step, source })
}

/// Database names are spliced into DDL, so only plain identifiers pass.
///
/// # Errors
///
/// Returns `InitError::InvalidDatabaseName` for anything outside
/// `[A-Za-z0-9_]{1,64}`.
pub fn validate_database_name(name: &str) -> Result<(), InitError> {
    let valid = !name.is_empty()
        && name.len() <= MAX_IDENTIFIER_LEN
        && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');

    if valid {
        Ok(())
    } else {
        Err(InitError::InvalidDatabaseName(name.to_owned()))
    }
}

// =============================================================================
// Inspection
// =============================================================================

/// Column names of one table, in ordinal order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableShape {
    pub name: String,
    pub columns: Vec<String>,
}

/// Read the tables and columns of `database` from `information_schema`.
///
/// # Errors
///
/// Returns `sqlx::Error` if the query fails.
pub async fn inspect(pool: &MySqlPool, database: &str) -> Result<Vec<TableShape>, sqlx::Error> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        r"
        SELECT CAST(TABLE_NAME AS CHAR) AS table_name,
               CAST(COLUMN_NAME AS CHAR) AS column_name
        FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = ?
        ORDER BY TABLE_NAME, ORDINAL_POSITION
        ",
    )
    .bind(database)
    .fetch_all(pool)
    .await?;

    let mut shapes: Vec<TableShape> = Vec::new();
    for (table, column) in rows {
        match shapes.last_mut() {
            Some(shape) if shape.name == table => shape.columns.push(column),
            _ => shapes.push(TableShape {
                name: table,
                columns: vec![column],
            }),
        }
    }

    Ok(shapes)
}

/// `table.column` entries of [`EXPECTED_COLUMNS`] absent from `shapes`.
#[must_use]
pub fn missing_columns(shapes: &[TableShape]) -> Vec<String> {
    let mut missing = Vec::new();

    for (table, columns) in EXPECTED_COLUMNS {
        let shape = shapes.iter().find(|s| s.name == *table);
        for column in *columns {
            let present = shape.is_some_and(|s| s.columns.iter().any(|c| c == column));
            if !present {
                missing.push(format!("{table}.{column}"));
            }
        }
    }

    if !missing.is_empty() {
        warn!(?missing, "Schema is missing columns");
    }

    missing
}
