//! API error type and response-body message normalisation.

use serde_json::Value;

use super::transport::TransportError;
use crate::messages;
use crate::session::SessionError;
use crate::validate::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("session rejected by server")]
    Unauthorized { message: Option<String> },
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },
    #[error("request timed out")]
    Timeout,
    #[error("transport failed: {0}")]
    Transport(String),
    #[error("response decode failed: {0}")]
    Decode(String),
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
    #[error("no active session")]
    MissingSession,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("session storage failed: {0}")]
    Session(#[from] SessionError),
}

/// Coarse failure classes shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    SessionExpired,
    Validation,
    NotFound,
    Conflict,
    PastDate,
    Server,
    Connectivity,
    Unknown,
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => Self::Timeout,
            TransportError::Network(msg) | TransportError::Build(msg) => Self::Transport(msg),
        }
    }
}

impl ApiError {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized { .. } | Self::MissingSession => ErrorCategory::SessionExpired,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Status { status, .. } => match *status {
                400 => ErrorCategory::Validation,
                404 => ErrorCategory::NotFound,
                409 => ErrorCategory::Conflict,
                422 => ErrorCategory::PastDate,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Unknown,
            },
            Self::Timeout | Self::Transport(_) => ErrorCategory::Connectivity,
            Self::Decode(_) | Self::HttpClientBuild(_) | Self::Session(_) => ErrorCategory::Unknown,
        }
    }

    /// HTTP status, when the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message extracted from the server's response body.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message } | Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text for the user: the server's own message when there is one,
    /// otherwise a per-category default, otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        if let Some(message) = self.server_message() {
            return message.to_string();
        }
        match (self, self.category()) {
            (Self::Validation(err), _) => err.message.clone(),
            (Self::MissingSession, _) => messages::NO_SESSION.to_string(),
            (_, ErrorCategory::SessionExpired) => messages::SESSION_EXPIRED.to_string(),
            (_, ErrorCategory::Connectivity) => messages::CONNECTION_ERROR.to_string(),
            (_, ErrorCategory::Server) => messages::SERVER_ERROR.to_string(),
            _ => fallback.to_string(),
        }
    }
}

// =============================================================================
// MESSAGE EXTRACTION
// =============================================================================

/// Pull a human-readable message out of an error response body.
///
/// Precedence: `message` field, `error` field, a JSON string body, then the
/// raw body as plain text. Blank values are skipped; HTML error pages and
/// other JSON shapes yield `None`.
#[must_use]
pub fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => ["message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str).and_then(non_blank)),
        Ok(Value::String(text)) => non_blank(&text),
        Ok(_) => None,
        Err(_) if looks_like_html(trimmed) => None,
        Err(_) => Some(trimmed.to_string()),
    }
}

fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() { None } else { Some(text.to_string()) }
}

// Proxy and servlet error pages.
fn looks_like_html(body: &str) -> bool {
    body.starts_with('<')
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
