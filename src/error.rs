//! Error types for the identity client, the session and the navigator.

use serde_json::Value;

/// Failures talking to the auth backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unauthorized")]
    Unauthorized { detail: Option<String> },

    #[error("request failed with status code {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Builds the error for a non-success response from its status and body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = detail_from_body(body);
        if status == 401 {
            ApiError::Unauthorized { detail }
        } else {
            ApiError::Status { status, detail }
        }
    }

    /// The message shown to the user: the backend's `detail` when it sent
    /// one, otherwise a generic description of the failure.
    pub fn message(&self) -> String {
        match self {
            ApiError::Unauthorized {
                detail: Some(detail),
            }
            | ApiError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::Unauthorized { detail: None } => {
                "Request failed with status code 401".to_string()
            }
            ApiError::Status {
                status,
                detail: None,
            } => format!("Request failed with status code {}", status),
            ApiError::Transport(e) => e.to_string(),
            ApiError::Decode(msg) => msg.clone(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

/// Extracts `detail` from an error body. A string is used as is; a list of
/// validation errors is reduced to their `msg` fields joined by `; `.
pub fn detail_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .filter(|msg| !msg.is_empty())
                .collect::<Vec<_>>()
                .join("; ");
            if joined.is_empty() {
                None
            } else {
                Some(joined)
            }
        }
        _ => None,
    }
}

/// Failures surfaced by `Session` operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no credential is set")]
    NotAuthenticated,

    /// The credential changed while an identity lookup was in flight, so
    /// its result was dropped.
    #[error("credential changed while the identity lookup was in flight")]
    Superseded,
}

impl SessionError {
    /// Message suitable for the login form.
    pub fn message(&self) -> String {
        match self {
            SessionError::Api(e) => e.message(),
            other => other.to_string(),
        }
    }
}

/// Failures settling a navigation.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("navigation exceeded {limit} redirects: {}", .trail.join(" -> "))]
    TooManyRedirects { limit: usize, trail: Vec<String> },
}
