//! Database adapters (connection pool wiring).

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::StoreError;

/// Pool settings for the Postgres backend.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Open a connection pool and check that the database answers.
pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(database_url)
        .await
        .map_err(|e| StoreError::persistence(format!("failed to connect to Postgres: {e}")))?;

    tracing::info!(max_connections = config.max_connections, "postgres pool ready");
    Ok(pool)
}
