use crate::domain::detection_event::DetectionEventInput;
use crate::domain::error::AppError;
use crate::domain::interview_session::InterviewSessionInput;
use crate::domain::report::SessionEndResult;
use crate::domain::status_check::StatusCheckInput;
use crate::infrastructure::config::AppConfig;
use crate::interfaces::state::AppState;
use actix_cors::Cors;
use actix_web::{
    dev::Server, error::InternalError, get, post, put, web, App, HttpResponse, HttpServer,
    Responder,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};


const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub app_state: Arc<AppState>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Serialize)]
struct RootResponse {
    message: &'static str,
}

#[get("/")]
async fn root() -> impl Responder {
    HttpResponse::Ok().json(RootResponse {
        message: "Video Proctoring API",
    })
}

#[post("/status")]
async fn create_status_check(
    data: web::Data<HttpState>,
    req: web::Json<StatusCheckInput>,
) -> impl Responder {
    match data
        .app_state
        .status_check_use_case
        .record(req.into_inner())
        .await
    {
        Ok(check) => HttpResponse::Ok().json(check),
        Err(e) => failure(&data.logs, "Status", "Failed to record status check", &e),
    }
}

#[get("/status")]
async fn list_status_checks(data: web::Data<HttpState>) -> impl Responder {
    match data.app_state.status_check_use_case.list().await {
        Ok(checks) => HttpResponse::Ok().json(checks),
        Err(e) => failure(&data.logs, "Status", "Failed to list status checks", &e),
    }
}

#[post("/sessions")]
async fn create_session(
    data: web::Data<HttpState>,
    req: web::Json<InterviewSessionInput>,
) -> impl Responder {
    match data
        .app_state
        .session_use_case
        .start_session(req.into_inner())
        .await
    {
        Ok(session) => {
            add_log(
                &data.logs,
                "INFO",
                "Sessions",
                &format!(
                    "Session started: {} (candidate={})",
                    session.id, session.candidate_name
                ),
            );
            HttpResponse::Ok().json(session)
        }
        Err(e) => failure(&data.logs, "Sessions", "Failed to start session", &e),
    }
}

#[get("/sessions")]
async fn list_sessions(data: web::Data<HttpState>) -> impl Responder {
    match data.app_state.session_use_case.list_sessions().await {
        Ok(sessions) => HttpResponse::Ok().json(sessions),
        Err(e) => failure(&data.logs, "Sessions", "Failed to list sessions", &e),
    }
}

#[get("/sessions/{session_id}")]
async fn get_session(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let session_id = path.into_inner();
    match data.app_state.session_use_case.get_session(&session_id).await {
        Ok(session) => HttpResponse::Ok().json(session),
        Err(e) => failure(
            &data.logs,
            "Sessions",
            &format!("Failed to fetch session {}", session_id),
            &e,
        ),
    }
}

#[put("/sessions/{session_id}/end")]
async fn end_session(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let session_id = path.into_inner();
    match data.app_state.session_use_case.end_session(&session_id).await {
        Ok(session) => {
            add_log(
                &data.logs,
                "INFO",
                "Sessions",
                &format!(
                    "Session ended: {} (events={} score={})",
                    session.id, session.total_events, session.integrity_score
                ),
            );
            HttpResponse::Ok().json(SessionEndResult {
                message: "Session ended successfully".to_string(),
                integrity_score: session.integrity_score,
            })
        }
        Err(e) => failure(
            &data.logs,
            "Sessions",
            &format!("Failed to end session {}", session_id),
            &e,
        ),
    }
}

#[post("/events")]
async fn create_event(
    data: web::Data<HttpState>,
    req: web::Json<DetectionEventInput>,
) -> impl Responder {
    match data
        .app_state
        .event_use_case
        .record_event(req.into_inner())
        .await
    {
        Ok(event) => {
            add_log(
                &data.logs,
                "INFO",
                "Events",
                &format!("{} for session {}", event.event_type, event.session_id),
            );
            HttpResponse::Ok().json(event)
        }
        Err(e) => failure(&data.logs, "Events", "Failed to record event", &e),
    }
}

#[get("/events/{session_id}")]
async fn list_events(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let session_id = path.into_inner();
    match data.app_state.event_use_case.list_events(&session_id).await {
        Ok(events) => HttpResponse::Ok().json(events),
        Err(e) => failure(
            &data.logs,
            "Events",
            &format!("Failed to list events for {}", session_id),
            &e,
        ),
    }
}

#[get("/reports/{session_id}")]
async fn get_report(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let session_id = path.into_inner();
    match data.app_state.report_use_case.build_report(&session_id).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => failure(
            &data.logs,
            "Reports",
            &format!("Failed to build report for {}", session_id),
            &e,
        ),
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = lock_logs(&data.logs);
    HttpResponse::Ok().json(&*logs)
}

/// Maps a domain error onto a status code and a `{"detail": ...}` body.
pub fn error_response(err: &AppError) -> HttpResponse {
    let body = ErrorBody {
        detail: err.detail().to_string(),
    };
    match err {
        AppError::NotFound(_) => HttpResponse::NotFound().json(body),
        AppError::ValidationError(_) => HttpResponse::UnprocessableEntity().json(body),
        AppError::Conflict(_) => HttpResponse::Conflict().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

fn failure(
    logs: &Mutex<Vec<LogEntry>>,
    source: &str,
    context: &str,
    err: &AppError,
) -> HttpResponse {
    let level = match err {
        AppError::NotFound(_) | AppError::ValidationError(_) | AppError::Conflict(_) => "WARN",
        _ => "ERROR",
    };
    add_log(logs, level, source, &format!("{}: {}", context, err));
    error_response(err)
}

fn lock_logs(logs: &Mutex<Vec<LogEntry>>) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
    match logs.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    match level {
        "ERROR" => error!(source = %source, "{}", message),
        "WARN" => warn!(source = %source, "{}", message),
        _ => info!(source = %source, "{}", message),
    }

    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = lock_logs(logs);
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

/// Registers every `/api` route. Malformed JSON bodies are answered with 422.
pub fn routes(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let body = ErrorBody {
            detail: err.to_string(),
        };
        InternalError::from_response(err, HttpResponse::UnprocessableEntity().json(body)).into()
    });

    cfg.service(
        web::scope("/api")
            .app_data(json_config)
            .service(root)
            .service(create_status_check)
            .service(list_status_checks)
            .service(create_session)
            .service(list_sessions)
            .service(get_session)
            .service(end_session)
            .service(create_event)
            .service(list_events)
            .service(get_report)
            .service(get_logs),
    );
}

fn build_cors(allowed_origins: &Option<Vec<String>>) -> Cors {
    match allowed_origins {
        None => Cors::permissive(),
        Some(origins) => origins.iter().fold(
            Cors::default()
                .allow_any_method()
                .allow_any_header()
                .supports_credentials(),
            |cors, origin| cors.allowed_origin(origin),
        ),
    }
}

pub fn start_server(
    app_state: Arc<AppState>,
    logs: Arc<Mutex<Vec<LogEntry>>>,
    config: &AppConfig,
) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState { app_state, logs });
    let allowed_origins = config.allowed_origins();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&allowed_origins))
            .app_data(state.clone())
            .configure(routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    Ok(server)
}
