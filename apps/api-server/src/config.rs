//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// The single browser origin allowed by CORS.
    pub cors_origin: String,
    pub upload_dir: PathBuf,
    pub upload_max_bytes: usize,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors_origin: "http://localhost:3000".to_string(),
            upload_dir: PathBuf::from("uploads"),
            upload_max_bytes: 5 * 1024 * 1024,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT").unwrap_or(defaults.port),
            cors_origin: env::var("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            upload_max_bytes: parse_var("UPLOAD_MAX_BYTES").unwrap_or(defaults.upload_max_bytes),
            request_timeout: parse_var("REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}
