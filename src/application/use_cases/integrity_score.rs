//! Integrity scoring over a session's detection log.
//!
//! Every session starts at [`BASE_INTEGRITY_SCORE`] and loses a fixed penalty
//! per event. Penalties are additive, so the order of events never changes the
//! result, and the final score is clamped at zero.

use crate::domain::detection_event::{DetectionEvent, EventKind};
use crate::domain::interview_session::BASE_INTEGRITY_SCORE;

pub const FOCUS_LOST_PENALTY: f64 = 2.0;
pub const NO_FACE_PENALTY: f64 = 5.0;
pub const MULTIPLE_FACES_PENALTY: f64 = 10.0;
pub const DEFAULT_OBJECT_PENALTY: f64 = 5.0;

/// One step of the object-detection cascade: if the lowercased details
/// contain any of `keywords`, the event costs `penalty`.
#[derive(Debug, Clone, Copy)]
pub struct ObjectRule {
    pub keywords: &'static [&'static str],
    pub penalty: f64,
}

impl ObjectRule {
    fn matches(&self, lowered_details: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowered_details.contains(keyword))
    }
}

/// Evaluated top to bottom; the first matching rule wins and later rules are
/// never consulted, so "phone and book" costs 15, not 25.
pub const OBJECT_RULES: &[ObjectRule] = &[
    ObjectRule {
        keywords: &["phone", "cell phone"],
        penalty: 15.0,
    },
    ObjectRule {
        keywords: &["book", "notebook"],
        penalty: 10.0,
    },
    ObjectRule {
        keywords: &["laptop", "computer"],
        penalty: 8.0,
    },
];

pub fn object_penalty(details: &str) -> f64 {
    let lowered = details.to_lowercase();
    OBJECT_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.penalty)
        .unwrap_or(DEFAULT_OBJECT_PENALTY)
}

/// Penalty for a single event. Unrecognised event types cost nothing.
pub fn event_penalty(event: &DetectionEvent) -> f64 {
    match event.kind() {
        Some(EventKind::FocusLost) => FOCUS_LOST_PENALTY,
        Some(EventKind::NoFace) => NO_FACE_PENALTY,
        Some(EventKind::MultipleFaces) => MULTIPLE_FACES_PENALTY,
        Some(EventKind::ObjectDetected) => object_penalty(&event.details),
        None => 0.0,
    }
}

pub fn calculate_integrity_score(events: &[DetectionEvent]) -> f64 {
    let total_penalty: f64 = events.iter().map(event_penalty).sum();
    (BASE_INTEGRITY_SCORE - total_penalty).max(0.0)
}
