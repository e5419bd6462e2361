use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;

use crate::domain::detection_event::DetectionEvent;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::db::EventStore;
use crate::shared::timestamp::{format_iso, parse_iso};

/// Append-only event log. Each insert takes the next `seq` for its session
/// in the same statement, and reads order by `seq`.
pub struct EventRepository {
    pool: SqlitePool,
}

impl EventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for EventRepository {
    async fn insert_event(&self, event: &DetectionEvent) -> Result<()> {
        // Seq is read inside the write statement, under its write lock.
        sqlx::query(
            "INSERT INTO detection_events (id, session_id, seq, event_type, details, confidence, timestamp)
             SELECT ?, ?, COALESCE(MAX(seq), 0) + 1, ?, ?, ?, ?
             FROM detection_events WHERE session_id = ?",
        )
        .bind(&event.id)
        .bind(&event.session_id)
        .bind(&event.event_type)
        .bind(&event.details)
        .bind(event.confidence)
        .bind(format_iso(&event.timestamp))
        .bind(&event.session_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to insert event: {e}")))?;

        Ok(())
    }

    async fn find_events(&self, session_id: &str) -> Result<Vec<DetectionEvent>> {
        let events = sqlx::query_as::<_, EventEntity>(
            "SELECT id, session_id, event_type, details, confidence, timestamp
             FROM detection_events WHERE session_id = ? ORDER BY seq ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list events: {e}")))?;

        events.into_iter().map(DetectionEvent::try_from).collect()
    }
}

#[derive(sqlx::FromRow)]
struct EventEntity {
    id: String,
    session_id: String,
    event_type: String,
    details: String,
    confidence: f64,
    timestamp: String,
}

impl TryFrom<EventEntity> for DetectionEvent {
    type Error = AppError;

    fn try_from(entity: EventEntity) -> Result<Self> {
        let timestamp = parse_iso(&entity.timestamp).map_err(|e| {
            AppError::DatabaseError(format!("Corrupt timestamp for event {}: {e}", entity.id))
        })?;

        Ok(Self {
            id: entity.id,
            session_id: entity.session_id,
            event_type: entity.event_type,
            details: entity.details,
            confidence: entity.confidence,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::connection::Database;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn event(id: &str, session_id: &str, event_type: &str, offset_secs: i64) -> DetectionEvent {
        DetectionEvent {
            id: id.to_string(),
            session_id: session_id.to_string(),
            event_type: event_type.to_string(),
            details: format!("details for {}", id),
            confidence: 0.75,
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
                + Duration::seconds(offset_secs),
        }
    }

    #[tokio::test]
    async fn test_events_come_back_in_insertion_order() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = EventRepository::new(db.pool());

        // Timestamps deliberately out of order; retrieval follows insertion.
        repo.insert_event(&event("e-1", "s-1", "focus_lost", 30)).await.unwrap();
        repo.insert_event(&event("e-2", "s-1", "no_face", 10)).await.unwrap();
        repo.insert_event(&event("e-3", "s-1", "object_detected", 20)).await.unwrap();

        let events = repo.find_events("s-1").await.unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e-1", "e-2", "e-3"]);
        assert_eq!(events[0], event("e-1", "s-1", "focus_lost", 30));
    }

    #[tokio::test]
    async fn test_events_are_scoped_by_session() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = EventRepository::new(db.pool());

        repo.insert_event(&event("e-1", "s-1", "focus_lost", 0)).await.unwrap();
        repo.insert_event(&event("e-2", "s-2", "no_face", 0)).await.unwrap();
        repo.insert_event(&event("e-3", "s-1", "no_face", 1)).await.unwrap();

        assert_eq!(repo.find_events("s-1").await.unwrap().len(), 2);
        assert_eq!(repo.find_events("s-2").await.unwrap().len(), 1);
        assert!(repo.find_events("s-3").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_event_type_is_stored_verbatim() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = EventRepository::new(db.pool());

        repo.insert_event(&event("e-1", "s-1", "Tab_Switch", 0)).await.unwrap();
        let events = repo.find_events("s-1").await.unwrap();
        assert_eq!(events[0].event_type, "Tab_Switch");
    }

    #[tokio::test]
    async fn test_duplicate_event_id_is_rejected() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = EventRepository::new(db.pool());

        repo.insert_event(&event("e-1", "s-1", "no_face", 0)).await.unwrap();
        let result = repo.insert_event(&event("e-1", "s-1", "no_face", 1)).await;
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
        assert_eq!(repo.find_events("s-1").await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_on_file_database_are_all_kept() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("events.db").display());
        let db = Database::open(&url).await.unwrap();
        let repo = Arc::new(EventRepository::new(db.pool()));

        let handles: Vec<_> = (0..40)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.insert_event(&event(&format!("e-{i}"), "s-1", "focus_lost", i))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let seqs: Vec<i64> = sqlx::query_scalar(
            "SELECT seq FROM detection_events WHERE session_id = ? ORDER BY seq",
        )
        .bind("s-1")
        .fetch_all(&db.pool())
        .await
        .unwrap();
        assert_eq!(seqs, (1..=40).collect::<Vec<i64>>());
        assert_eq!(repo.find_events("s-1").await.unwrap().len(), 40);

        db.close().await;
    }
}
