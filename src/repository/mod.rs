//! Data access layer (Repository pattern)

pub mod player;
pub mod user;

pub use player::PlayerRepository;
pub use user::UserRepository;

use crate::config::DatabaseConfig;
use crate::error::{AppError, Result};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use tracing::{debug, error, info};

/// Database connection pool handle.
///
/// Built explicitly from a [`DatabaseConfig`] and handed to each repository;
/// call [`DbPool::close`] on shutdown.
#[derive(Clone)]
pub struct DbPool {
    pool: MySqlPool,
}

impl DbPool {
    /// Open the pool, eagerly establishing `min_connections`
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to {}", config.redacted_url());
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(config.idle_timeout())
            .connect(&config.url)
            .await?;
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connected to database"
        );
        Ok(Self { pool })
    }

    pub fn inner(&self) -> &MySqlPool {
        &self.pool
    }

    /// Round-trip a trivial query to prove the database is reachable
    pub async fn ping(&self) -> Result<()> {
        let row: (i64,) = sqlx::query_as("SELECT 1").fetch_one(&self.pool).await?;
        debug!(result = row.0, "Database ping");
        Ok(())
    }

    /// Wait for checked-out connections to come back, then close them all
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

/// `map_err` adapter: classify a driver error and log it with its table and operation
pub(crate) fn log_failure(
    table: &'static str,
    operation: &'static str,
) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let err = AppError::from(e);
        error!(table, operation, error = %err, "Query failed");
        err
    }
}

/// Pool that never reaches a server; every acquire times out quickly
#[cfg(test)]
pub(crate) fn unreachable_pool() -> MySqlPool {
    sqlx::mysql::MySqlPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_millis(200))
        .connect_lazy("mysql://nobody@127.0.0.1:1/none")
        .unwrap()
}

/// In-memory sink for log lines emitted while a test runs
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl CapturedLogs {
    /// Route events on the current thread here until the guard is dropped
    pub(crate) fn install(&self) -> tracing::subscriber::DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[cfg(test)]
impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_log_failure_classifies_and_logs() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();

        let err = log_failure("JOUEUR", "create")(sqlx::Error::PoolTimedOut);

        assert_eq!(err.kind(), ErrorKind::Connection);
        let output = logs.contents();
        assert!(output.contains("Query failed"));
        assert!(output.contains("JOUEUR"));
        assert!(output.contains("create"));
    }
}
