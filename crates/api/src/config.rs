//! Environment-driven configuration for the API binary.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

use stockroom_infra::StoreConfig;

pub const ENV_BIND_ADDR: &str = "STOCKROOM_BIND_ADDR";
pub const ENV_DATABASE_URL: &str = "STOCKROOM_DATABASE_URL";
pub const ENV_MAX_CONNECTIONS: &str = "STOCKROOM_MAX_CONNECTIONS";
pub const ENV_BUSY_TIMEOUT_SECS: &str = "STOCKROOM_BUSY_TIMEOUT_SECS";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
}

impl ApiConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup; unset keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse()
            .with_context(|| format!("{ENV_BIND_ADDR} must be a socket address, got {raw_addr:?}"))?;

        let mut store = StoreConfig::default();
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            store.database_url = url;
        }
        if let Some(raw) = lookup(ENV_MAX_CONNECTIONS) {
            let max: u32 = raw
                .parse()
                .with_context(|| format!("{ENV_MAX_CONNECTIONS} must be an integer, got {raw:?}"))?;
            anyhow::ensure!(max > 0, "{ENV_MAX_CONNECTIONS} must be at least 1");
            store.max_connections = max;
        }
        if let Some(raw) = lookup(ENV_BUSY_TIMEOUT_SECS) {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("{ENV_BUSY_TIMEOUT_SECS} must be an integer, got {raw:?}"))?;
            store.busy_timeout = Duration::from_secs(secs);
        }

        Ok(Self { bind_addr, store })
    }

    /// Loopback listener over a private in-memory database.
    pub fn in_memory() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            store: StoreConfig::in_memory(),
        }
    }
}
