use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DetectionEventInput {
    #[validate(length(min = 1))]
    pub session_id: String,
    #[validate(length(min = 1))]
    pub event_type: String,
    pub details: String,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: f64,
}

/// A single detection reported by the upstream video pipeline.
///
/// `event_type` is kept as the raw string so unrecognised kinds survive
/// storage and show up in reports; use [`EventKind::parse`] to classify it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionEvent {
    pub id: String,
    pub session_id: String,
    pub event_type: String,
    pub details: String,
    pub confidence: f64,
    pub timestamp: DateTime<Utc>,
}

impl DetectionEvent {
    pub fn new(id: String, input: DetectionEventInput, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            session_id: input.session_id,
            event_type: input.event_type,
            details: input.details,
            confidence: input.confidence,
            timestamp,
        }
    }

    pub fn kind(&self) -> Option<EventKind> {
        EventKind::parse(&self.event_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    FocusLost,
    NoFace,
    MultipleFaces,
    ObjectDetected,
}

impl EventKind {
    /// Exact, case-sensitive match on the wire name.
    pub fn parse(event_type: &str) -> Option<Self> {
        match event_type {
            "focus_lost" => Some(EventKind::FocusLost),
            "no_face" => Some(EventKind::NoFace),
            "multiple_faces" => Some(EventKind::MultipleFaces),
            "object_detected" => Some(EventKind::ObjectDetected),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        for (name, kind) in [
            ("focus_lost", EventKind::FocusLost),
            ("no_face", EventKind::NoFace),
            ("multiple_faces", EventKind::MultipleFaces),
            ("object_detected", EventKind::ObjectDetected),
        ] {
            assert_eq!(EventKind::parse(name), Some(kind));
        }
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(EventKind::parse("Focus_Lost"), None);
        assert_eq!(EventKind::parse(" no_face"), None);
        assert_eq!(EventKind::parse("tab_switch"), None);
    }

    #[test]
    fn test_input_confidence_defaults_to_zero() {
        let input: DetectionEventInput = serde_json::from_str(
            r#"{"session_id":"s-1","event_type":"no_face","details":"nobody"}"#,
        )
        .unwrap();
        assert_eq!(input.confidence, 0.0);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_input_rejects_confidence_out_of_range() {
        let input = DetectionEventInput {
            session_id: "s-1".to_string(),
            event_type: "no_face".to_string(),
            details: String::new(),
            confidence: 1.5,
        };
        assert!(input.validate().is_err());
    }
}
