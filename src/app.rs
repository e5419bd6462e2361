use anyhow::Context;
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::infrastructure::bootstrap::build_app_state;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::connection::Database;
use crate::interfaces::http::{add_log, start_server, LogEntry};

/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub async fn run() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.log_level);

    let database = Database::open(&config.database_url)
        .await
        .context("Failed to open database")?;

    let logs: Arc<Mutex<Vec<LogEntry>>> = Arc::new(Mutex::new(Vec::new()));
    let app_state = Arc::new(build_app_state(&database, &config));

    let server = start_server(app_state, logs.clone(), &config)
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;

    add_log(
        &logs,
        "INFO",
        "Server",
        &format!("Listening on http://{}:{}/api", config.host, config.port),
    );

    let result = server.await;

    database.close().await;
    info!("Shutdown complete");

    result.context("HTTP server failed")
}
