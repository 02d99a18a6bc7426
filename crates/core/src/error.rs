//! Error types shared across the call-media layer

use thiserror::Error;

/// Domain error for call-control operations
///
/// Backend-specific failures are collapsed into three cases before they
/// leave the controller: the call is gone (`CallEnded`), anything else the
/// backend rejected (`Backend`), or a precondition on the call itself was
/// not met (`Validation`).
#[derive(Error, Debug)]
pub enum Error {
    /// The telephony session no longer exists or was already terminated
    #[error("Call ended")]
    CallEnded,

    /// Any other backend failure, message kept as the backend reported it
    #[error("{message}")]
    Backend {
        status: Option<u16>,
        message: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl Error {
    /// Whether this error means the call is gone
    pub fn is_call_ended(&self) -> bool {
        matches!(self, Self::CallEnded)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_is_unmodified() {
        let err = Error::Backend {
            status: Some(500),
            message: "Internal server error (x-ms-request-id: 42)".to_string(),
        };
        assert_eq!(err.to_string(), "Internal server error (x-ms-request-id: 42)");
        assert!(!err.is_call_ended());
    }

    #[test]
    fn test_call_ended() {
        assert!(Error::CallEnded.is_call_ended());
        assert!(!Error::validation("Voice ID is required").is_call_ended());
    }
}
