//! Application state handed to code that consumes the schema.

use std::sync::Arc;

use sqlx::MySqlPool;

use crate::config::ServerConfig;
use crate::db::Database;

/// Shared state: configuration plus the initialized database handle.
///
/// Cloning is cheap; all clones share one pool.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    database: Database,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig, database: Database) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, database }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn database(&self) -> &Database {
        &self.inner.database
    }

    #[must_use]
    pub fn pool(&self) -> &MySqlPool {
        self.inner.database.pool()
    }

    /// Close the shared pool. Other clones see a closed pool afterwards.
    pub async fn close(self) {
        self.inner.database.clone().close().await;
    }
}
