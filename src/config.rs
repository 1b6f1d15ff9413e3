//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_SESSION_FILE: &str = ".clinica-session.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeouts: Timeouts,
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `CLINICA_API_BASE_URL`: default `http://localhost:8080`
    /// - `CLINICA_REQUEST_TIMEOUT_SECS`: default 10
    /// - `CLINICA_CONNECT_TIMEOUT_SECS`: default 5
    /// - `CLINICA_SESSION_FILE`: default `.clinica-session.json`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is set but blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = match std::env::var("CLINICA_API_BASE_URL") {
            Ok(raw) => normalize_base_url(&raw).ok_or(ConfigError::Empty { var: "CLINICA_API_BASE_URL" })?,
            Err(_) => DEFAULT_API_BASE_URL.to_string(),
        };
        let timeouts = Timeouts {
            request_secs: env_parse_u64("CLINICA_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("CLINICA_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let session_file = std::env::var("CLINICA_SESSION_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        Ok(Self { base_url, timeouts, session_file })
    }

    /// Config pointing at `base_url` with default timeouts.
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            timeouts: Timeouts::default(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

/// Trim whitespace and trailing slashes; `None` when nothing is left.
#[must_use]
pub fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
