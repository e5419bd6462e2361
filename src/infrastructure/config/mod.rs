use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "Proctor.toml";
pub const CONFIG_PATH_ENV: &str = "PROCTOR_CONFIG";
pub const ENV_PREFIX: &str = "PROCTOR_";

/// What to do when a close request arrives for a session that is already
/// completed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReclosePolicy {
    /// Recompute score, event count and end time from the current log.
    #[default]
    Recompute,
    /// Return the frozen score without touching storage.
    Idempotent,
    /// Refuse with a conflict error.
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Comma-separated list of allowed origins, or `*` for any.
    pub cors_origins: String,
    pub log_level: String,
    pub list_limit: i64,
    pub reclose_policy: ReclosePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8001,
            database_url: "sqlite://proctor.db".to_string(),
            cors_origins: "*".to_string(),
            log_level: "info".to_string(),
            list_limit: 1000,
            reclose_policy: ReclosePolicy::Recompute,
        }
    }
}

impl AppConfig {
    /// Loads `.env`, then layers defaults < config file < `PROCTOR_*` env.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::from_figment(Self::figment(&path))
    }

    pub fn figment(config_path: &str) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment
            .extract()
            .map_err(|e| AppError::ConfigError(format!("Failed to load config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(AppError::ConfigError("port must be non-zero".to_string()));
        }
        if self.database_url.trim().is_empty() {
            return Err(AppError::ConfigError(
                "database_url is required".to_string(),
            ));
        }
        if self.list_limit <= 0 {
            return Err(AppError::ConfigError(
                "list_limit must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// `None` means any origin is allowed.
    pub fn allowed_origins(&self) -> Option<Vec<String>> {
        let origins: Vec<String> = self
            .cors_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
            None
        } else {
            Some(origins)
        }
    }
}
