use std::sync::Arc;

use crate::application::{
    DetectionEventUseCase, InterviewSessionUseCase, ReportUseCase, StatusCheckUseCase,
};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::connection::Database;
use crate::infrastructure::db::events::EventRepository;
use crate::infrastructure::db::sessions::SessionRepository;
use crate::infrastructure::db::status_checks::StatusCheckRepository;
use crate::infrastructure::db::{EventStore, SessionStore, StatusCheckStore};
use crate::interfaces::state::AppState;

/// Wires repositories over the open database into the use cases.
pub fn build_app_state(database: &Database, config: &AppConfig) -> AppState {
    let sessions: Arc<dyn SessionStore> = Arc::new(SessionRepository::new(database.pool()));
    let events: Arc<dyn EventStore> = Arc::new(EventRepository::new(database.pool()));
    let status_checks: Arc<dyn StatusCheckStore> =
        Arc::new(StatusCheckRepository::new(database.pool()));

    AppState {
        session_use_case: InterviewSessionUseCase::new(
            sessions.clone(),
            events.clone(),
            config.reclose_policy,
            config.list_limit,
        ),
        event_use_case: DetectionEventUseCase::new(events.clone()),
        report_use_case: ReportUseCase::new(sessions, events),
        status_check_use_case: StatusCheckUseCase::new(status_checks, config.list_limit),
    }
}
