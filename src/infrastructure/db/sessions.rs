use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;

use crate::domain::error::{AppError, Result};
use crate::domain::interview_session::{InterviewSession, SessionClosure, SessionStatus};
use crate::infrastructure::db::SessionStore;
use crate::shared::timestamp::{format_iso, parse_iso};

pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn insert_session(&self, session: &InterviewSession) -> Result<()> {
        sqlx::query(
            "INSERT INTO interview_sessions (id, candidate_name, interviewer_name, start_time, end_time, status, total_events, integrity_score)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&session.id)
        .bind(&session.candidate_name)
        .bind(&session.interviewer_name)
        .bind(format_iso(&session.start_time))
        .bind(session.end_time.as_ref().map(format_iso))
        .bind(session.status.as_str())
        .bind(session.total_events)
        .bind(session.integrity_score)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to insert session: {e}")))?;

        Ok(())
    }

    async fn find_session(&self, session_id: &str) -> Result<Option<InterviewSession>> {
        let session = sqlx::query_as::<_, SessionEntity>(
            "SELECT id, candidate_name, interviewer_name, start_time, end_time, status, total_events, integrity_score
             FROM interview_sessions WHERE id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch session: {e}")))?;

        session.map(InterviewSession::try_from).transpose()
    }

    async fn list_sessions(&self, limit: i64) -> Result<Vec<InterviewSession>> {
        let sessions = sqlx::query_as::<_, SessionEntity>(
            "SELECT id, candidate_name, interviewer_name, start_time, end_time, status, total_events, integrity_score
             FROM interview_sessions ORDER BY rowid ASC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list sessions: {e}")))?;

        sessions.into_iter().map(InterviewSession::try_from).collect()
    }

    async fn complete_session(
        &self,
        session_id: &str,
        closure: &SessionClosure,
    ) -> Result<InterviewSession> {
        let result = sqlx::query(
            "UPDATE interview_sessions
             SET end_time = ?, status = ?, total_events = ?, integrity_score = ?
             WHERE id = ?",
        )
        .bind(format_iso(&closure.end_time))
        .bind(SessionStatus::Completed.as_str())
        .bind(closure.total_events)
        .bind(closure.integrity_score)
        .bind(session_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to complete session: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Session not found: {}",
                session_id
            )));
        }

        self.find_session(session_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Session not found: {}", session_id))
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionEntity {
    id: String,
    candidate_name: String,
    interviewer_name: String,
    start_time: String,
    end_time: Option<String>,
    status: String,
    total_events: i64,
    integrity_score: f64,
}

impl TryFrom<SessionEntity> for InterviewSession {
    type Error = AppError;

    fn try_from(entity: SessionEntity) -> Result<Self> {
        let start_time = parse_iso(&entity.start_time).map_err(|e| {
            AppError::DatabaseError(format!("Corrupt start_time for session {}: {e}", entity.id))
        })?;
        let end_time = entity
            .end_time
            .as_deref()
            .map(parse_iso)
            .transpose()
            .map_err(|e| {
                AppError::DatabaseError(format!("Corrupt end_time for session {}: {e}", entity.id))
            })?;
        let status = entity.status.parse::<SessionStatus>().map_err(|e| {
            AppError::DatabaseError(format!("Corrupt status for session {}: {e}", entity.id))
        })?;

        Ok(Self {
            id: entity.id,
            candidate_name: entity.candidate_name,
            interviewer_name: entity.interviewer_name,
            start_time,
            end_time,
            status,
            total_events: entity.total_events,
            integrity_score: entity.integrity_score,
        })
    }
}
