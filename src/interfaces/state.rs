use crate::application::{
    DetectionEventUseCase, InterviewSessionUseCase, ReportUseCase, StatusCheckUseCase,
};

pub struct AppState {
    pub session_use_case: InterviewSessionUseCase,
    pub event_use_case: DetectionEventUseCase,
    pub report_use_case: ReportUseCase,
    pub status_check_use_case: StatusCheckUseCase,
}
