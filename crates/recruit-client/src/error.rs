//! Client error taxonomy
//!
//! - transport: `Transport`, `Timeout` (never retried here)
//! - unrecoverable auth: `RefreshFailed`, `SessionExpired`
//! - any other non-2xx: `Status`, carrying the backend's error payload
//! - `Decode` / `InvalidRequest` for bodies that cannot be (de)serialized

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("backend returned {status}: {message}")]
    Status {
        status: u16,
        message: String,
        body: Value,
    },

    #[error("session refresh failed: {0}")]
    RefreshFailed(#[from] recruit_auth::Error),

    #[error("session expired, sign in again")]
    SessionExpired,

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(err.to_string())
        } else {
            Error::Transport(err.to_string())
        }
    }

    /// Build a `Status` error from a non-2xx response body.
    pub(crate) fn from_status(status: u16, bytes: &[u8]) -> Self {
        let body = serde_json::from_slice::<Value>(bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(bytes).into_owned())
        });
        let message = backend_message(&body).unwrap_or_else(|| default_reason(status));
        Error::Status {
            status,
            message,
            body,
        }
    }

    /// HTTP status, for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The call ended without usable credentials; the user must sign in.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Error::RefreshFailed(_) | Error::SessionExpired | Error::Status { status: 401, .. }
        )
    }

    /// Text suitable for a failure notification.
    pub fn user_message(&self) -> String {
        match self {
            Error::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Human-readable message from a backend error body.
///
/// Prefers `error`, then DRF's `detail`, then the first field error of a
/// validation payload (`{"email": ["already registered"]}`).
fn backend_message(body: &Value) -> Option<String> {
    match body {
        Value::Object(map) => {
            for key in ["error", "detail", "message"] {
                if let Some(Value::String(text)) = map.get(key) {
                    return Some(text.clone());
                }
            }
            map.iter().find_map(|(field, value)| match value {
                Value::String(text) => Some(format!("{field}: {text}")),
                Value::Array(items) => items
                    .iter()
                    .find_map(Value::as_str)
                    .map(|text| format!("{field}: {text}")),
                _ => None,
            })
        }
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    }
}

fn default_reason(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("request failed")
        .to_string()
}
