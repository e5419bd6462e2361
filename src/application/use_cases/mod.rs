pub mod detection_event;
pub mod integrity_score;
pub mod interview_session;
pub mod report;
pub mod report_summary;
pub mod status_check;
