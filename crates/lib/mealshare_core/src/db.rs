//! Ephemeral local PostgreSQL for integration tests and local development.
//!
//! Drives `initdb`, `pg_ctl`, and `pg_isready` as child processes against a
//! temporary data directory that is cleaned up on drop.

use std::net::TcpListener;
use std::path::PathBuf;
use std::time::Duration;

use sqlx::postgres::PgPool;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::sleep;

/// Database name created for the service.
const DATABASE_NAME: &str = "mealshare";

/// Maximum time to wait for PostgreSQL to become ready.
const READY_TIMEOUT: Duration = Duration::from_secs(30);

/// Poll interval while waiting for readiness.
const READY_POLL: Duration = Duration::from_millis(200);

#[derive(Debug, Error)]
pub enum DbError {
    #[error("PostgreSQL command failed: {0}")]
    Command(String),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pg_config not found on PATH")]
    PgConfigNotFound,

    #[error("PostgreSQL not ready after {0:?}")]
    ReadyTimeout(Duration),
}

/// A throwaway PostgreSQL instance bound to an ephemeral port.
pub struct LocalPostgres {
    bin_dir: PathBuf,
    data_dir: PathBuf,
    port: u16,
    started: bool,
    /// Holds the tempdir so it lives as long as the instance.
    _tempdir: tempfile::TempDir,
}

impl LocalPostgres {
    /// Create an instance with temporary storage. PG binaries are discovered
    /// via `pg_config --bindir` on PATH.
    pub async fn ephemeral() -> Result<Self, DbError> {
        let output = Command::new("pg_config")
            .arg("--bindir")
            .output()
            .await
            .map_err(|_| DbError::PgConfigNotFound)?;
        if !output.status.success() {
            return Err(DbError::PgConfigNotFound);
        }
        let bin_dir = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());

        let tempdir = tempfile::tempdir()?;
        let data_dir = tempdir.path().join("pgdata");

        Ok(Self {
            bin_dir,
            data_dir,
            port: 0,
            started: false,
            _tempdir: tempdir,
        })
    }

    /// Initialize the data directory and start the server; creates the
    /// application database once the server answers `pg_isready`.
    pub async fn start(&mut self) -> Result<(), DbError> {
        if !self.data_dir.join("PG_VERSION").exists() {
            let output = Command::new(self.bin_dir.join("initdb"))
                .arg("-D")
                .arg(&self.data_dir)
                .arg("--no-locale")
                .arg("--encoding=UTF8")
                .output()
                .await?;
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(DbError::Command(format!("initdb failed: {stderr}")));
            }
        }

        self.port = find_free_port()?;

        let port_opt = format!(
            "-p {} -k {} -h localhost",
            self.port,
            self.data_dir.display()
        );
        let logfile = self.data_dir.join("postgresql.log");
        let output = Command::new(self.bin_dir.join("pg_ctl"))
            .arg("-D")
            .arg(&self.data_dir)
            .arg("-o")
            .arg(&port_opt)
            .arg("-l")
            .arg(&logfile)
            .arg("start")
            .output()
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DbError::Command(format!("pg_ctl start failed: {stderr}")));
        }

        self.wait_for_ready().await?;
        self.started = true;
        self.create_database_if_missing().await?;

        tracing::info!(port = self.port, "ephemeral PostgreSQL ready");
        Ok(())
    }

    /// Stop the server gracefully. The data directory goes away on drop.
    pub async fn stop(&mut self) -> Result<(), DbError> {
        if !self.started {
            return Ok(());
        }
        let output = Command::new(self.bin_dir.join("pg_ctl"))
            .arg("-D")
            .arg(&self.data_dir)
            .arg("-m")
            .arg("fast")
            .arg("stop")
            .output()
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DbError::Command(format!("pg_ctl stop failed: {stderr}")));
        }
        self.started = false;
        Ok(())
    }

    /// Connection URL for the application database.
    pub fn connection_url(&self) -> String {
        format!("postgresql://localhost:{}/{}", self.port, DATABASE_NAME)
    }

    async fn wait_for_ready(&self) -> Result<(), DbError> {
        let pg_isready = self.bin_dir.join("pg_isready");
        let deadline = tokio::time::Instant::now() + READY_TIMEOUT;
        loop {
            let output = Command::new(&pg_isready)
                .arg("-p")
                .arg(self.port.to_string())
                .arg("-h")
                .arg("localhost")
                .output()
                .await?;
            if output.status.success() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(DbError::ReadyTimeout(READY_TIMEOUT));
            }
            sleep(READY_POLL).await;
        }
    }

    async fn create_database_if_missing(&self) -> Result<(), DbError> {
        let maintenance_url = format!("postgresql://localhost:{}/postgres", self.port);
        let pool = PgPool::connect(&maintenance_url).await?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
                .bind(DATABASE_NAME)
                .fetch_one(&pool)
                .await?;
        if !exists {
            // CREATE DATABASE cannot use bind parameters
            sqlx::query(&format!("CREATE DATABASE \"{DATABASE_NAME}\""))
                .execute(&pool)
                .await?;
        }

        pool.close().await;
        Ok(())
    }
}

/// Find a free ephemeral port by binding to port 0.
fn find_free_port() -> Result<u16, DbError> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
