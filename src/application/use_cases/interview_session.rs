use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::application::use_cases::integrity_score::calculate_integrity_score;
use crate::domain::error::{AppError, Result};
use crate::domain::interview_session::{
    InterviewSession, InterviewSessionInput, SessionClosure, SessionStatus,
};
use crate::infrastructure::config::ReclosePolicy;
use crate::infrastructure::db::{EventStore, SessionStore};

pub const SESSION_NOT_FOUND: &str = "Session not found";

pub struct InterviewSessionUseCase {
    sessions: Arc<dyn SessionStore>,
    events: Arc<dyn EventStore>,
    reclose_policy: ReclosePolicy,
    list_limit: i64,
}

impl InterviewSessionUseCase {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        events: Arc<dyn EventStore>,
        reclose_policy: ReclosePolicy,
        list_limit: i64,
    ) -> Self {
        Self {
            sessions,
            events,
            reclose_policy,
            list_limit,
        }
    }

    pub async fn start_session(&self, input: InterviewSessionInput) -> Result<InterviewSession> {
        input.validate()?;

        let session = InterviewSession::start(Uuid::new_v4().to_string(), input, Utc::now());
        self.sessions.insert_session(&session).await?;

        info!(
            session_id = %session.id,
            candidate = %session.candidate_name,
            interviewer = %session.interviewer_name,
            "Interview session started"
        );
        Ok(session)
    }

    pub async fn get_session(&self, session_id: &str) -> Result<InterviewSession> {
        self.sessions
            .find_session(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(SESSION_NOT_FOUND.to_string()))
    }

    pub async fn list_sessions(&self) -> Result<Vec<InterviewSession>> {
        self.sessions.list_sessions(self.list_limit).await
    }

    /// Closes the session, freezing its score, event count and end time.
    ///
    /// The event read and the session write are two separate statements, so
    /// two concurrent closes of the same session race and the last write
    /// wins. Events appended between the read and the write are not counted.
    pub async fn end_session(&self, session_id: &str) -> Result<InterviewSession> {
        let session = self.get_session(session_id).await?;

        match session.status {
            SessionStatus::Active => {}
            SessionStatus::Completed => match self.reclose_policy {
                ReclosePolicy::Recompute => {
                    warn!(session_id = %session_id, "Recomputing score for completed session");
                }
                ReclosePolicy::Idempotent => return Ok(session),
                ReclosePolicy::Reject => {
                    return Err(AppError::Conflict("Session already ended".to_string()));
                }
            },
            SessionStatus::Interrupted => {
                return Err(AppError::Conflict(
                    "Session was interrupted and cannot be ended".to_string(),
                ));
            }
        }

        let events = self.events.find_events(session_id).await?;
        let closure = SessionClosure {
            end_time: Utc::now(),
            total_events: events.len() as i64,
            integrity_score: calculate_integrity_score(&events),
        };

        let updated = self.sessions.complete_session(session_id, &closure).await?;
        info!(
            session_id = %session_id,
            total_events = closure.total_events,
            integrity_score = closure.integrity_score,
            "Interview session ended"
        );
        Ok(updated)
    }
}
