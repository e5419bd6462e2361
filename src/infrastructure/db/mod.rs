//! Persistence collaborator.
//!
//! Use cases depend only on the store traits below; [`connection::Database`]
//! owns the pool and hands out the SQLite-backed implementations.

pub mod connection;
pub mod events;
pub mod sessions;
pub mod status_checks;

use async_trait::async_trait;

use crate::domain::detection_event::DetectionEvent;
use crate::domain::error::Result;
use crate::domain::interview_session::{InterviewSession, SessionClosure};
use crate::domain::status_check::StatusCheck;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert_session(&self, session: &InterviewSession) -> Result<()>;
    async fn find_session(&self, session_id: &str) -> Result<Option<InterviewSession>>;
    /// Sessions in insertion order, at most `limit` of them.
    async fn list_sessions(&self, limit: i64) -> Result<Vec<InterviewSession>>;
    /// Marks the session completed with the given derived fields and returns
    /// the updated record. `NotFound` if no such session exists.
    async fn complete_session(
        &self,
        session_id: &str,
        closure: &SessionClosure,
    ) -> Result<InterviewSession>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn insert_event(&self, event: &DetectionEvent) -> Result<()>;
    /// Events for `session_id` in insertion order.
    async fn find_events(&self, session_id: &str) -> Result<Vec<DetectionEvent>>;
}

#[async_trait]
pub trait StatusCheckStore: Send + Sync {
    async fn insert_status_check(&self, check: &StatusCheck) -> Result<()>;
    async fn list_status_checks(&self, limit: i64) -> Result<Vec<StatusCheck>>;
}
