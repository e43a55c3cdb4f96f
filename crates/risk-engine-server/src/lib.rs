pub mod api;
pub mod config;
pub mod http;
pub mod logging;
mod server;

pub use config::{ConfigError, LogFormat, ServerConfig, StorageTarget};
pub use server::RiskServer;
