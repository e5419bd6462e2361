use std::sync::Arc;

use crate::application::use_cases::interview_session::SESSION_NOT_FOUND;
use crate::application::use_cases::report_summary::generate_report_summary;
use crate::domain::error::{AppError, Result};
use crate::domain::report::InterviewReport;
use crate::infrastructure::db::{EventStore, SessionStore};

pub struct ReportUseCase {
    sessions: Arc<dyn SessionStore>,
    events: Arc<dyn EventStore>,
}

impl ReportUseCase {
    pub fn new(sessions: Arc<dyn SessionStore>, events: Arc<dyn EventStore>) -> Self {
        Self { sessions, events }
    }

    /// Session, its events in insertion order, and a summary over them.
    /// The summary is always recomputed; the session's stored score is
    /// whatever the last close froze.
    pub async fn build_report(&self, session_id: &str) -> Result<InterviewReport> {
        let session = self
            .sessions
            .find_session(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(SESSION_NOT_FOUND.to_string()))?;

        let events = self.events.find_events(session_id).await?;
        let summary = generate_report_summary(&events);

        Ok(InterviewReport {
            session,
            events,
            summary,
        })
    }
}
