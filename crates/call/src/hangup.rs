//! Hang-up detection and per-operation handling
//!
//! The backend reports a vanished call either as `NotFound` or as a generic
//! failure mentioning that the call is already terminated. Both become
//! [`Error::CallEnded`]. What an operation does with it is fixed per
//! operation: playback, queue clearing, recognition and hang-up swallow it,
//! the rest escalate it to the caller.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use voicebot_core::Error;
use voicebot_transport::BackendError;

/// Marker the backend puts in failures on a terminated call
const CALL_TERMINATED_MARKER: &str = "call already terminated";

/// Call-control operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaOperation {
    Speak,
    PlayChunk,
    PlayFile,
    ClearQueue,
    RecognizeChoice,
    Transfer,
    HangUp,
    StartStreaming,
    StopStreaming,
}

impl MediaOperation {
    pub const ALL: [MediaOperation; 9] = [
        Self::Speak,
        Self::PlayChunk,
        Self::PlayFile,
        Self::ClearQueue,
        Self::RecognizeChoice,
        Self::Transfer,
        Self::HangUp,
        Self::StartStreaming,
        Self::StopStreaming,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Speak => "speak",
            Self::PlayChunk => "play_chunk",
            Self::PlayFile => "play_file",
            Self::ClearQueue => "clear_queue",
            Self::RecognizeChoice => "recognize_choice",
            Self::Transfer => "transfer",
            Self::HangUp => "hang_up",
            Self::StartStreaming => "start_streaming",
            Self::StopStreaming => "stop_streaming",
        }
    }

    /// What the operation does when the call has ended
    pub fn hangup_policy(&self) -> HangupPolicy {
        HANGUP_POLICIES
            .get(self)
            .copied()
            .unwrap_or(HangupPolicy::Escalate)
    }
}

impl std::fmt::Display for MediaOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HangupPolicy {
    /// Report "not done" (`false` or `()`) and carry on
    Swallow,
    /// Return [`Error::CallEnded`]
    Escalate,
}

static HANGUP_POLICIES: Lazy<HashMap<MediaOperation, HangupPolicy>> = Lazy::new(|| {
    use HangupPolicy::*;
    use MediaOperation::*;
    let mut map = HashMap::new();
    map.insert(Speak, Swallow);
    map.insert(PlayChunk, Swallow);
    map.insert(ClearQueue, Swallow);
    map.insert(RecognizeChoice, Swallow);
    map.insert(HangUp, Swallow);
    map.insert(PlayFile, Escalate);
    map.insert(Transfer, Escalate);
    map.insert(StartStreaming, Escalate);
    map.insert(StopStreaming, Escalate);
    map
});

/// Whether a backend failure means the call is gone
pub fn is_call_terminated(error: &BackendError) -> bool {
    match error {
        BackendError::NotFound(_) => true,
        BackendError::RequestFailed { message, .. } => message
            .to_lowercase()
            .contains(CALL_TERMINATED_MARKER),
        BackendError::Transport(_) => false,
    }
}

/// Map a backend failure into the domain taxonomy
pub fn translate(error: BackendError) -> Error {
    if is_call_terminated(&error) {
        return Error::CallEnded;
    }
    Error::Backend {
        status: error.status(),
        message: error.message().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_operation_has_a_policy() {
        for operation in MediaOperation::ALL {
            assert!(HANGUP_POLICIES.contains_key(&operation), "{}", operation);
        }
    }

    #[test]
    fn test_policy_table() {
        let swallowed: Vec<_> = MediaOperation::ALL
            .into_iter()
            .filter(|op| op.hangup_policy() == HangupPolicy::Swallow)
            .collect();
        assert_eq!(
            swallowed,
            vec![
                MediaOperation::Speak,
                MediaOperation::PlayChunk,
                MediaOperation::ClearQueue,
                MediaOperation::RecognizeChoice,
                MediaOperation::HangUp,
            ]
        );
    }

    #[test]
    fn test_not_found_is_call_ended() {
        let error = translate(BackendError::NotFound("Call not found".to_string()));
        assert!(error.is_call_ended());
    }

    #[test]
    fn test_terminated_message_is_call_ended() {
        for message in [
            "Call already terminated.",
            "CALL ALREADY TERMINATED",
            "Action failed: call already terminated (8522)",
        ] {
            let error = translate(BackendError::RequestFailed {
                status: 400,
                message: message.to_string(),
            });
            assert!(error.is_call_ended(), "{}", message);
        }
    }

    #[test]
    fn test_other_failures_keep_message() {
        let error = translate(BackendError::RequestFailed {
            status: 500,
            message: "Internal server error".to_string(),
        });
        match error {
            Error::Backend { status, message } => {
                assert_eq!(status, Some(500));
                assert_eq!(message, "Internal server error");
            }
            other => panic!("unexpected {:?}", other),
        }

        let error = translate(BackendError::Transport("call already terminated".to_string()));
        assert!(!error.is_call_ended());
    }
}
