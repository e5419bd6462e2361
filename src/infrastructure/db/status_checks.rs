use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;

use crate::domain::error::{AppError, Result};
use crate::domain::status_check::StatusCheck;
use crate::infrastructure::db::StatusCheckStore;
use crate::shared::timestamp::{format_iso, parse_iso};

pub struct StatusCheckRepository {
    pool: SqlitePool,
}

impl StatusCheckRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatusCheckStore for StatusCheckRepository {
    async fn insert_status_check(&self, check: &StatusCheck) -> Result<()> {
        sqlx::query("INSERT INTO status_checks (id, client_name, timestamp) VALUES (?, ?, ?)")
            .bind(&check.id)
            .bind(&check.client_name)
            .bind(format_iso(&check.timestamp))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to insert status check: {e}")))?;

        Ok(())
    }

    async fn list_status_checks(&self, limit: i64) -> Result<Vec<StatusCheck>> {
        let rows = sqlx::query_as::<_, (String, String, String)>(
            "SELECT id, client_name, timestamp FROM status_checks ORDER BY rowid ASC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list status checks: {e}")))?;

        rows.into_iter()
            .map(|(id, client_name, timestamp)| -> Result<StatusCheck> {
                let timestamp = parse_iso(&timestamp).map_err(|e| {
                    AppError::DatabaseError(format!("Corrupt timestamp for status check {id}: {e}"))
                })?;
                Ok(StatusCheck {
                    id,
                    client_name,
                    timestamp,
                })
            })
            .collect()
    }
}
