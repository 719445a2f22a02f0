//! Store configuration.

use std::time::Duration;

/// Connection settings for the SQLite catalog store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// sqlx SQLite URL, e.g. `sqlite://inventory.db` or `sqlite::memory:`.
    pub database_url: String,
    pub max_connections: u32,
    /// How long SQLite waits on a locked database before failing a statement.
    pub busy_timeout: Duration,
    /// How long a caller waits for a pooled connection.
    pub acquire_timeout: Duration,
}

impl StoreConfig {
    pub const DEFAULT_DATABASE_URL: &'static str = "sqlite://inventory.db";

    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    /// Private in-memory database on a single connection (tests, demos).
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Self::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: Self::DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            busy_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(30),
        }
    }
}
