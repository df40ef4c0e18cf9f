//! Employee database bootstrap.
//!
//! Ensures the `employees_db` database and its `admin`, `category` and
//! `employee` tables exist, seeds the admin credential, verifies the
//! resulting schema, then releases its connections and exits.
//!
//! Every step runs in order and the first failure stops the run with a
//! non-zero exit code.
//!
//! # Configuration
//!
//! See [`employees_server::config`] for the environment variables.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use employees_server::config::{LogFormat, ServerConfig};
use employees_server::db::{Database, InitOptions, SchemaInitializer};
use employees_server::error::AppError;
use employees_server::state::AppState;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "employees_server=info,sqlx=warn".into());

    let is_json = format == LogFormat::Json;
    let json_layer = is_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Text);
            let err = AppError::from(e);
            err.report();
            return ExitCode::from(err.exit_code());
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.report();
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), AppError> {
    let initializer = SchemaInitializer::new(InitOptions::default());
    let (database, report) =
        Database::connect_and_initialize(&config.database, &initializer).await?;
    let state = AppState::new(config, database);

    tracing::info!(
        database = %report.database,
        steps = report.steps.len(),
        seed = ?report.seed_outcome(),
        "Schema bootstrap complete"
    );

    let verified = state.database().missing_columns().await;
    state.close().await;

    let missing = verified?;
    if !missing.is_empty() {
        return Err(AppError::IncompleteSchema(missing));
    }

    tracing::info!("Schema verified");
    Ok(())
}
