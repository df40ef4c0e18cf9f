//! Unified error handling for the bootstrap process.

use thiserror::Error;

use crate::config::ConfigError;
use crate::db::{InitError, RepositoryError};

/// Process-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Schema bootstrap failed.
    #[error("Initialization error: {0}")]
    Init(#[from] InitError),

    /// A repository operation failed.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),

    /// The schema could not be inspected after bootstrap.
    #[error("Schema inspection error: {0}")]
    Inspect(#[from] sqlx::Error),

    /// The bootstrap finished but expected columns are absent.
    #[error("Schema is missing columns: {}", .0.join(", "))]
    IncompleteSchema(Vec<String>),
}

impl AppError {
    /// Send the error to Sentry (when configured) and log it.
    pub fn report(&self) {
        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Employee database bootstrap failed"
        );
    }

    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Init(_) | Self::Repository(_) | Self::Inspect(_) | Self::IncompleteSchema(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_exit_2() {
        let err = AppError::from(ConfigError::MissingEnvVar("DATABASE_USER".to_string()));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing environment variable: DATABASE_USER"
        );
    }

    #[test]
    fn test_init_errors_exit_1() {
        let err = AppError::from(InitError::InvalidDatabaseName("bad-name".to_string()));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_incomplete_schema_lists_columns() {
        let err = AppError::IncompleteSchema(vec!["category.name".to_string(), "employee.image".to_string()]);
        assert_eq!(err.to_string(), "Schema is missing columns: category.name, employee.image");
        assert_eq!(err.exit_code(), 1);
    }
}
