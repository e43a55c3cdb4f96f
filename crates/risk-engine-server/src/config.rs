use std::path::PathBuf;

use thiserror::Error;

pub const ENV_HTTP_ADDR: &str = "RISK_ENGINE_HTTP_ADDR";
pub const ENV_DB: &str = "RISK_ENGINE_DB";
pub const ENV_LOG_FORMAT: &str = "RISK_ENGINE_LOG_FORMAT";

const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_DB_PATH: &str = "./data/risk-evaluations.json";
const MEMORY_DB: &str = ":memory:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{ENV_LOG_FORMAT} must be pretty or json, got {0:?}")]
    LogFormat(String),
    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    Memory,
    JsonFile(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub http_addr: String,
    pub storage: StorageTarget,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            storage: StorageTarget::JsonFile(PathBuf::from(DEFAULT_DB_PATH)),
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = lookup(ENV_HTTP_ADDR) {
            let addr = addr.trim();
            if addr.is_empty() {
                return Err(ConfigError::Empty(ENV_HTTP_ADDR));
            }
            config.http_addr = addr.to_string();
        }

        if let Some(db) = lookup(ENV_DB) {
            let db = db.trim();
            config.storage = match db {
                "" => return Err(ConfigError::Empty(ENV_DB)),
                MEMORY_DB => StorageTarget::Memory,
                path => StorageTarget::JsonFile(PathBuf::from(path)),
            };
        }

        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            config.log_format = match format.trim().to_ascii_lowercase().as_str() {
                "" | "pretty" | "text" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                _ => return Err(ConfigError::LogFormat(format)),
            };
        }

        Ok(config)
    }
}
