pub mod use_cases;

pub use use_cases::detection_event::DetectionEventUseCase;
pub use use_cases::integrity_score::calculate_integrity_score;
pub use use_cases::interview_session::InterviewSessionUseCase;
pub use use_cases::report::ReportUseCase;
pub use use_cases::report_summary::generate_report_summary;
pub use use_cases::status_check::StatusCheckUseCase;
