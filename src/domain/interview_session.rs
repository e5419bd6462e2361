use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::domain::error::AppError;

/// Starting score for every session; penalties only ever subtract from it.
pub const BASE_INTEGRITY_SCORE: f64 = 100.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
    Interrupted,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Interrupted => "interrupted",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SessionStatus::Active),
            "completed" => Ok(SessionStatus::Completed),
            "interrupted" => Ok(SessionStatus::Interrupted),
            other => Err(AppError::ValidationError(format!(
                "Unknown session status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InterviewSessionInput {
    #[validate(length(min = 1))]
    pub candidate_name: String,
    #[validate(length(min = 1))]
    pub interviewer_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InterviewSession {
    pub id: String,
    pub candidate_name: String,
    pub interviewer_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub total_events: i64,
    pub integrity_score: f64,
}

impl InterviewSession {
    pub fn start(id: String, input: InterviewSessionInput, start_time: DateTime<Utc>) -> Self {
        Self {
            id,
            candidate_name: input.candidate_name,
            interviewer_name: input.interviewer_name,
            start_time,
            end_time: None,
            status: SessionStatus::Active,
            total_events: 0,
            integrity_score: BASE_INTEGRITY_SCORE,
        }
    }
}

/// Derived fields frozen onto a session when it is closed.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionClosure {
    pub end_time: DateTime<Utc>,
    pub total_events: i64,
    pub integrity_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_defaults() {
        let input = InterviewSessionInput {
            candidate_name: "John Doe".to_string(),
            interviewer_name: "Jane Smith".to_string(),
        };
        let session = InterviewSession::start("s-1".to_string(), input, Utc::now());
        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(session.integrity_score, 100.0);
        assert_eq!(session.total_events, 0);
        assert!(session.end_time.is_none());
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            SessionStatus::Active,
            SessionStatus::Completed,
            SessionStatus::Interrupted,
        ] {
            assert_eq!(status.as_str().parse::<SessionStatus>().unwrap(), status);
        }
        assert!("paused".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&SessionStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }

    #[test]
    fn test_input_rejects_empty_names() {
        let input = InterviewSessionInput {
            candidate_name: String::new(),
            interviewer_name: "Jane".to_string(),
        };
        assert!(input.validate().is_err());
    }
}
