use serde::{Deserialize, Serialize};

use crate::domain::detection_event::DetectionEvent;
use crate::domain::interview_session::InterviewSession;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEntry {
    pub time: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub details: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportSummary {
    pub total_events: usize,
    pub focus_lost_count: usize,
    pub no_face_count: usize,
    pub multiple_faces_count: usize,
    pub object_detected_count: usize,
    pub detected_objects: Vec<String>,
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewReport {
    pub session: InterviewSession,
    pub events: Vec<DetectionEvent>,
    pub summary: ReportSummary,
}

/// Response body for a close request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEndResult {
    pub message: String,
    pub integrity_score: f64,
}
