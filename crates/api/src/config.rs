//! Process configuration, read once at startup.

use std::net::SocketAddr;
use std::time::Duration;

use ledger_auth::{AuthConfig, ConfigError};

pub const LISTEN_ADDR_VAR: &str = "LEDGER_LISTEN_ADDR";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const STORE_TIMEOUT_VAR: &str = "LEDGER_STORE_TIMEOUT_MS";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(2_000);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    /// Postgres URL. `None` runs against the in-memory store.
    pub database_url: Option<String>,
    /// Upper bound on a single store lookup made by the authorization gate.
    pub store_timeout: Duration,
    pub auth: AuthConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = lookup(LISTEN_ADDR_VAR)
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid(LISTEN_ADDR_VAR, e.to_string()))?;

        let database_url = lookup(DATABASE_URL_VAR).filter(|url| !url.trim().is_empty());

        let store_timeout = match lookup(STORE_TIMEOUT_VAR) {
            None => DEFAULT_STORE_TIMEOUT,
            Some(raw) => {
                let ms = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::invalid(STORE_TIMEOUT_VAR, e.to_string()))?;
                if ms == 0 {
                    return Err(ConfigError::invalid(STORE_TIMEOUT_VAR, "must be positive"));
                }
                Duration::from_millis(ms)
            }
        };

        Ok(Self {
            listen_addr,
            database_url,
            store_timeout,
            auth: AuthConfig::from_lookup(&lookup)?,
        })
    }
}
