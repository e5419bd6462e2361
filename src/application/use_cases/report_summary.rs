use crate::domain::detection_event::{DetectionEvent, EventKind};
use crate::domain::report::{ReportSummary, TimelineEntry};
use crate::shared::timestamp::format_iso;

/// Aggregate counts and a display timeline over `events`, preserving their
/// order. Unrecognised event types still count toward `total_events` and
/// appear in the timeline.
pub fn generate_report_summary(events: &[DetectionEvent]) -> ReportSummary {
    let mut summary = ReportSummary {
        total_events: events.len(),
        timeline: Vec::with_capacity(events.len()),
        ..Default::default()
    };

    for event in events {
        match event.kind() {
            Some(EventKind::FocusLost) => summary.focus_lost_count += 1,
            Some(EventKind::NoFace) => summary.no_face_count += 1,
            Some(EventKind::MultipleFaces) => summary.multiple_faces_count += 1,
            Some(EventKind::ObjectDetected) => {
                summary.object_detected_count += 1;
                summary.detected_objects.push(event.details.clone());
            }
            None => {}
        }

        summary.timeline.push(TimelineEntry {
            time: format_iso(&event.timestamp),
            event_type: event.event_type.clone(),
            details: event.details.clone(),
        });
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn event_at(event_type: &str, details: &str, offset_secs: i64) -> DetectionEvent {
        let base = Utc.with_ymd_and_hms(2024, 5, 2, 14, 0, 0).unwrap();
        DetectionEvent {
            id: format!("evt-{}", offset_secs),
            session_id: "session-1".to_string(),
            event_type: event_type.to_string(),
            details: details.to_string(),
            confidence: 0.5,
            timestamp: base + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn test_empty_log() {
        let summary = generate_report_summary(&[]);
        assert_eq!(summary, ReportSummary::default());
    }

    #[test]
    fn test_counts_per_kind() {
        let events = vec![
            event_at("focus_lost", "tab hidden", 0),
            event_at("focus_lost", "tab hidden", 1),
            event_at("no_face", "", 2),
            event_at("multiple_faces", "2 faces", 3),
            event_at("object_detected", "cell phone", 4),
        ];
        let summary = generate_report_summary(&events);
        assert_eq!(summary.total_events, 5);
        assert_eq!(summary.focus_lost_count, 2);
        assert_eq!(summary.no_face_count, 1);
        assert_eq!(summary.multiple_faces_count, 1);
        assert_eq!(summary.object_detected_count, 1);
    }

    #[test]
    fn test_detected_objects_keep_duplicates_in_order() {
        let events = vec![
            event_at("object_detected", "book", 0),
            event_at("focus_lost", "", 1),
            event_at("object_detected", "cell phone", 2),
            event_at("object_detected", "book", 3),
        ];
        let summary = generate_report_summary(&events);
        assert_eq!(summary.detected_objects, vec!["book", "cell phone", "book"]);
    }

    #[test]
    fn test_unknown_type_only_in_total_and_timeline() {
        let events = vec![event_at("tab_switch", "alt-tab", 0)];
        let summary = generate_report_summary(&events);
        assert_eq!(summary.total_events, 1);
        assert_eq!(summary.focus_lost_count, 0);
        assert_eq!(summary.object_detected_count, 0);
        assert_eq!(summary.timeline.len(), 1);
        assert_eq!(summary.timeline[0].event_type, "tab_switch");
    }

    #[test]
    fn test_timeline_entry_shape() {
        let summary = generate_report_summary(&[event_at("no_face", "left frame", 30)]);
        let entry = &summary.timeline[0];
        assert_eq!(entry.time, "2024-05-02T14:00:30.000000+00:00");

        let json = serde_json::to_value(entry).unwrap();
        assert_eq!(json["type"], "no_face");
        assert_eq!(json["details"], "left frame");
    }

    fn arb_event_type() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("focus_lost"),
            Just("no_face"),
            Just("multiple_faces"),
            Just("object_detected"),
            Just("unknown"),
        ]
    }

    proptest! {
        #[test]
        fn prop_summary_lengths_track_input(types in prop::collection::vec(arb_event_type(), 0..48)) {
            let events: Vec<_> = types
                .iter()
                .enumerate()
                .map(|(i, t)| event_at(t, &format!("d{}", i), i as i64))
                .collect();
            let summary = generate_report_summary(&events);

            prop_assert_eq!(summary.total_events, events.len());
            prop_assert_eq!(summary.timeline.len(), events.len());
            prop_assert_eq!(summary.detected_objects.len(), summary.object_detected_count);

            let known = summary.focus_lost_count
                + summary.no_face_count
                + summary.multiple_faces_count
                + summary.object_detected_count;
            prop_assert!(known <= summary.total_events);
            let unknown = types.iter().filter(|t| **t == "unknown").count();
            prop_assert_eq!(known + unknown, summary.total_events);

            for (entry, event) in summary.timeline.iter().zip(events.iter()) {
                prop_assert_eq!(&entry.details, &event.details);
                prop_assert_eq!(&entry.event_type, &event.event_type);
            }
        }
    }
}
