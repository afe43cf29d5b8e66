//! API server configuration.

use mealshare_core::auth::jwt::resolve_jwt_secret;
use mealshare_core::store;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3000").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Connection pool capacity.
    pub max_connections: u32,
    /// Bounded wait for a pooled connection, in seconds.
    pub acquire_timeout_secs: u64,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                  | Default                                  |
    /// |---------------------------|------------------------------------------|
    /// | `BIND_ADDR`               | `127.0.0.1:3000`                         |
    /// | `DATABASE_URL`            | `postgres://localhost:5432/mealshare`    |
    /// | `JWT_SECRET`              | generated & persisted to file            |
    /// | `DB_MAX_CONNECTIONS`      | 10                                       |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | 5                                        |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/mealshare".into()),
            jwt_secret: resolve_jwt_secret(),
            max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(store::DEFAULT_MAX_CONNECTIONS),
            acquire_timeout_secs: std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(store::DEFAULT_ACQUIRE_TIMEOUT.as_secs()),
        }
    }

    /// The store configuration this API config implies.
    pub fn store_config(&self) -> store::StoreConfig {
        let mut config = store::StoreConfig::new(&self.database_url);
        config.max_connections = self.max_connections;
        config.acquire_timeout = std::time::Duration::from_secs(self.acquire_timeout_secs);
        config
    }
}
