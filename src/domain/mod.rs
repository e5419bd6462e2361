pub mod detection_event;
pub mod error;
pub mod interview_session;
pub mod report;
pub mod status_check;
