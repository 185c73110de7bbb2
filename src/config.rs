//! Configuration loader and defaults for the t2sweb server.
//!
//! Exposes a lazily-initialized `CONFIG` which reads values from environment
//! variables (with sensible defaults). Fields cover the listening address
//! (`host`, `port`) and the access log (`log_path`, `log_max_bytes`,
//! `log_backups`).
//!
use std::env;
use std::path::PathBuf;

use once_cell::sync::Lazy;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_LOG_PATH: &str = "/app/logs/t2s.log";
const DEFAULT_LOG_MAX_BYTES: u64 = 10_000;
const DEFAULT_LOG_BACKUPS: u32 = 3;

/// Application configuration containing network binding and access log settings
pub struct Config {
    /// Interface the HTTP server binds to
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Access log file
    pub log_path: PathBuf,
    /// Size threshold (bytes) that triggers a log rotation
    pub log_max_bytes: u64,
    /// Number of rotated backup files retained
    pub log_backups: u32,
}

impl Config {
    /// Build a configuration from the environment, falling back to defaults
    /// for unset or malformed values.
    pub fn from_env() -> Self {
        Config {
            host: env::var("T2S_HOST").unwrap_or_else(|_| DEFAULT_HOST.into()),
            port: env::var("T2S_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            log_path: env::var("T2S_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| DEFAULT_LOG_PATH.into()),
            log_max_bytes: env::var("T2S_LOG_MAX_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_LOG_MAX_BYTES),
            log_backups: env::var("T2S_LOG_BACKUPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_LOG_BACKUPS),
        }
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Global application configuration instance, lazily initialized
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
