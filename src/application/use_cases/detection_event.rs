use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::domain::detection_event::{DetectionEvent, DetectionEventInput};
use crate::domain::error::Result;
use crate::infrastructure::db::EventStore;

pub struct DetectionEventUseCase {
    events: Arc<dyn EventStore>,
}

impl DetectionEventUseCase {
    pub fn new(events: Arc<dyn EventStore>) -> Self {
        Self { events }
    }

    /// Appends an event to the session's log. The session reference is not
    /// checked and unrecognised event types are stored as given.
    pub async fn record_event(&self, input: DetectionEventInput) -> Result<DetectionEvent> {
        input.validate()?;

        let event = DetectionEvent::new(Uuid::new_v4().to_string(), input, Utc::now());
        self.events.insert_event(&event).await?;

        if event.kind().is_none() {
            debug!(
                session_id = %event.session_id,
                event_type = %event.event_type,
                "Recorded event with unrecognised type"
            );
        }
        info!(
            session_id = %event.session_id,
            event_type = %event.event_type,
            "Detection event recorded"
        );
        Ok(event)
    }

    pub async fn list_events(&self, session_id: &str) -> Result<Vec<DetectionEvent>> {
        self.events.find_events(session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use crate::infrastructure::db::connection::Database;
    use crate::infrastructure::db::events::EventRepository;

    fn input(session_id: &str, event_type: &str, details: &str) -> DetectionEventInput {
        DetectionEventInput {
            session_id: session_id.to_string(),
            event_type: event_type.to_string(),
            details: details.to_string(),
            confidence: 0.9,
        }
    }

    #[tokio::test]
    async fn test_record_and_list() {
        let db = Database::open_in_memory().await.unwrap();
        let use_case = DetectionEventUseCase::new(Arc::new(EventRepository::new(db.pool())));

        let first = use_case
            .record_event(input("s-1", "focus_lost", "tab hidden"))
            .await
            .unwrap();
        let second = use_case
            .record_event(input("s-1", "object_detected", "book"))
            .await
            .unwrap();

        let events = use_case.list_events("s-1").await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, first.id);
        assert_eq!(events[1].id, second.id);
        assert_eq!(events[1].details, "book");
    }

    #[tokio::test]
    async fn test_unknown_type_is_accepted() {
        let db = Database::open_in_memory().await.unwrap();
        let use_case = DetectionEventUseCase::new(Arc::new(EventRepository::new(db.pool())));

        let event = use_case
            .record_event(input("s-1", "gaze_away", ""))
            .await
            .unwrap();
        assert!(event.kind().is_none());
        assert_eq!(use_case.list_events("s-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_empty_event_type() {
        let db = Database::open_in_memory().await.unwrap();
        let use_case = DetectionEventUseCase::new(Arc::new(EventRepository::new(db.pool())));

        let result = use_case.record_event(input("s-1", "", "")).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
