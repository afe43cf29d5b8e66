//! Store access: bounded connection pool and failure normalization.
//!
//! Every query in the service runs against a `sqlx::PgPool` built here. The
//! pool scopes acquisition per statement and returns the connection only after
//! the query future has resolved, on success and failure alike, so no code
//! path can leak or release a connection early.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use thiserror::Error;

/// Default pool capacity.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default bounded wait for acquiring a connection.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection pool configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    /// Pool capacity.
    pub max_connections: u32,
    /// Bounded wait for a free connection before failing with `Unavailable`.
    pub acquire_timeout: Duration,
}

impl StoreConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

/// Normalized store failures.
///
/// Lower layers return these untouched; the API boundary maps each variant to
/// exactly one status code. `Failure` details stay server-side.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique-constraint violation (SQLSTATE 23505).
    #[error("duplicate key on constraint {constraint}")]
    Conflict { constraint: String },

    /// No connection could be acquired within the pool's bounded wait.
    #[error("no database connection available")]
    Unavailable,

    /// Any other execution failure. Logged in full, never shown to callers.
    #[error("query execution failed")]
    Failure(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut => StoreError::Unavailable,
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict {
                constraint: db.constraint().unwrap_or("unknown").to_string(),
            },
            other => StoreError::Failure(other),
        }
    }
}

/// Build the shared connection pool.
pub async fn connect(config: &StoreConfig) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = StoreConfig::new("postgres://localhost/mealshare");
        assert_eq!(DEFAULT_MAX_CONNECTIONS, config.max_connections);
        assert_eq!(DEFAULT_ACQUIRE_TIMEOUT, config.acquire_timeout);
    }

    #[test]
    fn pool_exhaustion_maps_to_unavailable() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Unavailable));
    }

    #[test]
    fn other_errors_map_to_failure() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Failure(_)));
    }
}
