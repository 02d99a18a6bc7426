//! Backend and transport errors

use thiserror::Error;

/// Failure reported by the call automation backend for a single request.
///
/// The backend signals "the call no longer exists" in two shapes: a
/// `NotFound` response, or a generic failure whose message says the call
/// is already terminated. Both are surfaced as-is; interpretation belongs
/// to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{message}")]
    RequestFailed { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl BackendError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::RequestFailed { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }

    /// Human readable message, without the variant prefix
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(message) => message,
            Self::RequestFailed { message, .. } => message,
            Self::Transport(message) => message,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Transport(format!("Request encoding failed: {}", err))
    }
}

/// Client construction errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
