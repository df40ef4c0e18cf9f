//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DATABASE_ENDPOINT` - MySQL host address
//! - `DATABASE_USER` - MySQL user
//! - `DATABASE_PASSWORD` - MySQL password
//!
//! ## Optional
//! - `DATABASE_PORT` - MySQL port (default: 3306)
//! - `DATABASE_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `LOG_FORMAT` - `json` for JSON log lines, anything else for text

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3306;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Process configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// MySQL connection settings
    pub database: DatabaseConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Log output format
    pub log_format: LogFormat,
}

/// MySQL connection settings.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Host address of the MySQL server
    pub host: String,
    /// Port of the MySQL server
    pub port: u16,
    /// Authentication principal
    pub user: String,
    /// Authentication secret
    pub password: SecretString,
    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseConfig {
    /// Build settings for a host with default port and pool size.
    #[must_use]
    pub fn new(host: impl Into<String>, user: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            user: user.into(),
            password,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = required(lookup, "DATABASE_ENDPOINT")?;
        let user = required(lookup, "DATABASE_USER")?;
        let password = SecretString::from(required(lookup, "DATABASE_PASSWORD")?);

        let port = parsed_or(lookup, "DATABASE_PORT", DEFAULT_PORT)?;
        let max_connections = parsed_or(lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "DATABASE_MAX_CONNECTIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            user,
            password,
            max_connections,
        })
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database = DatabaseConfig::from_lookup(lookup)?;
        let sentry_dsn = optional(lookup, "SENTRY_DSN");
        let sentry_environment = optional(lookup, "SENTRY_ENVIRONMENT");
        let sentry_sample_rate = optional(lookup, "SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let log_format = match optional(lookup, "LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            database,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            log_format,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Blank values count as unset.
fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn parsed_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional(lookup, key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DATABASE_ENDPOINT", "db.internal"),
        ("DATABASE_USER", "employees"),
        ("DATABASE_PASSWORD", "s3cr3t-pw"),
    ];

    #[test]
    fn test_required_only_uses_defaults() {
        let config = ServerConfig::from_lookup(&lookup_from(REQUIRED)).unwrap();

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.user, "employees");
        assert_eq!(config.database.password.expose_secret(), "s3cr3t-pw");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.database.max_connections, 5);
        assert!(config.sentry_dsn.is_none());
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_missing_endpoint() {
        let lookup = lookup_from(&[("DATABASE_USER", "u"), ("DATABASE_PASSWORD", "p")]);
        let err = ServerConfig::from_lookup(&lookup).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "DATABASE_ENDPOINT"));
    }

    #[test]
    fn test_missing_password() {
        let lookup = lookup_from(&[("DATABASE_ENDPOINT", "h"), ("DATABASE_USER", "u")]);
        let err = ServerConfig::from_lookup(&lookup).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "DATABASE_PASSWORD"));
    }

    #[test]
    fn test_optional_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("DATABASE_PORT", "3307"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("SENTRY_DSN", "https://key@sentry.example/1"),
            ("SENTRY_SAMPLE_RATE", "0.25"),
            ("LOG_FORMAT", "json"),
        ]);
        let config = ServerConfig::from_lookup(&lookup_from(&pairs)).unwrap();

        assert_eq!(config.database.port, 3307);
        assert_eq!(config.database.max_connections, 12);
        assert_eq!(
            config.sentry_dsn.as_deref(),
            Some("https://key@sentry.example/1")
        );
        assert!((config.sentry_sample_rate - 0.25).abs() < f32::EPSILON);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_port() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DATABASE_PORT", "not-a-port"));
        let err = ServerConfig::from_lookup(&lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "DATABASE_PORT"));
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("DATABASE_MAX_CONNECTIONS", "0"));
        let err = ServerConfig::from_lookup(&lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "DATABASE_MAX_CONNECTIONS"));
    }

    #[test]
    fn test_blank_optional_is_unset() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([("DATABASE_PORT", "  "), ("SENTRY_DSN", "")]);
        let config = ServerConfig::from_lookup(&lookup_from(&pairs)).unwrap();
        assert_eq!(config.database.port, 3306);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_database_config_debug_redacts_password() {
        let config = DatabaseConfig::new("db.internal", "employees", SecretString::from("hunter2-pw"));
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("db.internal"));
        assert!(debug_output.contains("employees"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2-pw"));
    }
}
