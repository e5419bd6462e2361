use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::domain::error::{AppError, Result};

const SCHEMA: &str = include_str!("../../../resources/schema.sql");

/// Owns the SQLite pool for the lifetime of the process.
///
/// Open it once at startup, hand [`Database::pool`] clones to repositories,
/// and call [`Database::close`] on shutdown.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn open(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::DatabaseError(format!("Failed to parse database URL: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.prepare().await?;
        info!(database_url = %database_url, "Database ready");
        Ok(db)
    }

    /// Private in-memory database. The pool is pinned to a single connection
    /// that never expires, since each SQLite memory connection is its own
    /// database.
    pub async fn open_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::DatabaseError(format!("Failed to parse database URL: {e}")))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to open memory database: {e}")))?;

        let db = Self { pool };
        db.prepare().await?;
        Ok(db)
    }

    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database closed");
    }

    async fn prepare(&self) -> Result<()> {
        apply_schema(&self.pool).await?;

        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Database health check failed: {e}")))?;

        Ok(())
    }
}

async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA.split(';') {
        let stmt = statement.trim();
        if stmt.is_empty() {
            continue;
        }
        sqlx::query(stmt)
            .execute(pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to apply schema statement: {e}")))?;
    }
    Ok(())
}
