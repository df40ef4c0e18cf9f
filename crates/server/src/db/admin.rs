//! Admin credential repository.
//!
//! The seed upsert relies on the UNIQUE key on `admin.email`: a second run
//! hits the duplicate key and updates the password in place instead of
//! adding a row.

use secrecy::{ExposeSecret, SecretString};
use sqlx::{Executor, MySql, MySqlPool};

use employees_core::{AdminId, Email};

use super::RepositoryError;
use super::schema::InitError;
use crate::models::{Admin, AdminSeed};

const UPSERT_SEED_SQL: &str = r"
INSERT INTO admin (email, password)
VALUES (?, ?)
ON DUPLICATE KEY UPDATE password = VALUES(password)
";

/// What the seed upsert did to the `admin` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// No row existed for the email.
    Inserted,
    /// A row existed with a different password, which was overwritten.
    Updated,
    /// A row existed with the same password.
    Unchanged,
}

impl SeedOutcome {
    /// Classify an `INSERT ... ON DUPLICATE KEY UPDATE` result.
    ///
    /// MySQL reports 1 affected row for an insert, 2 for an update and 0
    /// when the existing row already held the values. Connections with
    /// `CLIENT_FOUND_ROWS` report 1 for that last case too; an unchanged row
    /// generates no insert id, which is how it is told apart from an insert.
    ///
    /// Returns `None` for counts a single-row upsert cannot produce.
    #[must_use]
    pub const fn from_upsert(rows_affected: u64, last_insert_id: u64) -> Option<Self> {
        match rows_affected {
            0 => Some(Self::Unchanged),
            1 if last_insert_id == 0 => Some(Self::Unchanged),
            1 => Some(Self::Inserted),
            2 => Some(Self::Updated),
            _ => None,
        }
    }

    /// Whether the stored credential differs from before the upsert.
    #[must_use]
    pub const fn changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Upsert `seed` through any MySQL executor.
///
/// Used on the bootstrap connection, where the pool does not exist yet.
///
/// # Errors
///
/// Returns `InitError::Seed` if the statement fails and
/// `InitError::UnexpectedAffectedRows` for an impossible row count.
pub async fn upsert_seed<'e, E>(executor: E, seed: &AdminSeed) -> Result<SeedOutcome, InitError>
where
    E: Executor<'e, Database = MySql>,
{
    let result = sqlx::query(UPSERT_SEED_SQL)
        .bind(seed.email.as_str())
        .bind(seed.password.expose_secret())
        .execute(executor)
        .await
        .map_err(|source| InitError::Seed {
            email: seed.email.to_string(),
            source,
        })?;

    SeedOutcome::from_upsert(result.rows_affected(), result.last_insert_id())
        .ok_or(InitError::UnexpectedAffectedRows(result.rows_affected()))
}

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct AdminRow {
    id: i32,
    email: Option<String>,
    password: Option<String>,
}

impl TryFrom<AdminRow> for Admin {
    type Error = RepositoryError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        let raw_email = row
            .email
            .ok_or_else(|| RepositoryError::DataCorruption(format!("admin {} has no email", row.id)))?;
        let email = Email::parse(&raw_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: AdminId::new(row.id),
            email,
            password: SecretString::from(row.password.unwrap_or_default()),
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for `admin` table operations.
pub struct AdminRepository<'a> {
    pool: &'a MySqlPool,
}

impl<'a> AdminRepository<'a> {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// Upsert the seed credential.
    ///
    /// # Errors
    ///
    /// See [`upsert_seed`].
    pub async fn seed(&self, seed: &AdminSeed) -> Result<SeedOutcome, InitError> {
        upsert_seed(self.pool, seed).await
    }

    /// Get an admin by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Admin>, RepositoryError> {
        let row: Option<AdminRow> =
            sqlx::query_as("SELECT id, email, password FROM admin WHERE email = ?")
                .bind(email.as_str())
                .fetch_optional(self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Count the rows stored for an email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_email(&self, email: &Email) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admin WHERE email = ?")
            .bind(email.as_str())
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_affected_rows() {
        assert_eq!(SeedOutcome::from_upsert(1, 1), Some(SeedOutcome::Inserted));
        assert_eq!(SeedOutcome::from_upsert(2, 1), Some(SeedOutcome::Updated));
        assert_eq!(SeedOutcome::from_upsert(0, 0), Some(SeedOutcome::Unchanged));
    }

    #[test]
    fn test_found_rows_report_is_unchanged() {
        assert_eq!(SeedOutcome::from_upsert(1, 0), Some(SeedOutcome::Unchanged));
    }

    #[test]
    fn test_impossible_counts_rejected() {
        assert_eq!(SeedOutcome::from_upsert(3, 1), None);
        assert_eq!(SeedOutcome::from_upsert(u64::MAX, 0), None);
    }

    #[test]
    fn test_changed() {
        assert!(SeedOutcome::Inserted.changed());
        assert!(SeedOutcome::Updated.changed());
        assert!(!SeedOutcome::Unchanged.changed());
    }

    #[test]
    fn test_upsert_targets_unique_email() {
        assert!(UPSERT_SEED_SQL.contains("ON DUPLICATE KEY UPDATE password = VALUES(password)"));
    }
}
