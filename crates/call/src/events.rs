//! Completion events sent back by the call automation backend
//!
//! Events arrive as a JSON array of cloud events. The operation context
//! attached to the originating request is echoed back in `data`.

use serde::Deserialize;
use std::collections::BTreeSet;

use voicebot_core::{OperationContext, Result};

use crate::context::decode_contexts;

const EVENT_TYPE_PREFIX: &str = "Microsoft.Communication.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallEventKind {
    PlayCompleted,
    PlayFailed,
    RecognizeCompleted,
    RecognizeFailed,
    CallTransferAccepted,
    CallTransferFailed,
    CallDisconnected,
    /// Any other event type, name without namespace
    Other(String),
}

impl CallEventKind {
    fn from_type(event_type: &str) -> Self {
        let name = event_type
            .strip_prefix(EVENT_TYPE_PREFIX)
            .unwrap_or(event_type);
        match name {
            "PlayCompleted" => Self::PlayCompleted,
            "PlayFailed" => Self::PlayFailed,
            "RecognizeCompleted" => Self::RecognizeCompleted,
            "RecognizeFailed" => Self::RecognizeFailed,
            "CallTransferAccepted" => Self::CallTransferAccepted,
            "CallTransferFailed" => Self::CallTransferFailed,
            "CallDisconnected" => Self::CallDisconnected,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultInformation {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub sub_code: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Choice recognized during a choice recognition
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceResult {
    pub label: String,
    #[serde(default)]
    pub recognized_phrase: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventData {
    #[serde(default)]
    call_connection_id: Option<String>,
    #[serde(default)]
    operation_context: Option<String>,
    #[serde(default)]
    result_information: Option<ResultInformation>,
    #[serde(default)]
    choice_result: Option<ChoiceResult>,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    data: EventData,
}

/// One callback event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallEvent {
    pub kind: CallEventKind,
    pub call_connection_id: Option<String>,
    /// Raw operation context, as sent with the request
    pub operation_context: Option<String>,
    pub result_information: Option<ResultInformation>,
    pub choice_result: Option<ChoiceResult>,
}

impl From<RawEvent> for CallEvent {
    fn from(raw: RawEvent) -> Self {
        Self {
            kind: CallEventKind::from_type(&raw.event_type),
            call_connection_id: raw.data.call_connection_id,
            operation_context: raw.data.operation_context,
            result_information: raw.data.result_information,
            choice_result: raw.data.choice_result,
        }
    }
}

impl CallEvent {
    /// Parse a single event
    pub fn parse(json: &str) -> Result<Self> {
        let raw: RawEvent = serde_json::from_str(json)?;
        Ok(raw.into())
    }

    /// Parse a callback body holding an array of events
    pub fn parse_batch(json: &str) -> Result<Vec<Self>> {
        let raw: Vec<RawEvent> = serde_json::from_str(json)?;
        Ok(raw.into_iter().map(Self::from).collect())
    }

    /// Contexts attached to the originating operation
    pub fn contexts(&self) -> Result<BTreeSet<OperationContext>> {
        decode_contexts(self.operation_context.as_deref())
    }

    pub fn has_context(&self, context: OperationContext) -> bool {
        self.contexts()
            .map(|contexts| contexts.contains(&context))
            .unwrap_or(false)
    }

    /// Label of the recognized choice, if any
    pub fn recognized_label(&self) -> Option<&str> {
        self.choice_result.as_ref().map(|choice| choice.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BATCH: &str = r#"[
        {
            "id": "7dd4a8b9-2b73-4bcd-b7f8-6b2f1e1f5c21",
            "source": "calling/callConnections/abc",
            "type": "Microsoft.Communication.PlayCompleted",
            "data": {
                "callConnectionId": "abc",
                "operationContext": "[\"goodbye\"]",
                "resultInformation": {"code": 200, "subCode": 0, "message": "Action completed successfully."}
            }
        },
        {
            "type": "Microsoft.Communication.RecognizeCompleted",
            "data": {
                "callConnectionId": "abc",
                "operationContext": "[\"ivr_lang_select\"]",
                "recognitionType": "choices",
                "choiceResult": {"label": "en-US", "recognizedPhrase": "English"}
            }
        },
        {
            "type": "Microsoft.Communication.ParticipantsUpdated",
            "data": {"callConnectionId": "abc"}
        }
    ]"#;

    #[test]
    fn test_parse_batch() {
        let events = CallEvent::parse_batch(BATCH).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].kind, CallEventKind::PlayCompleted);
        assert_eq!(
            events[0].result_information.as_ref().and_then(|r| r.code),
            Some(200)
        );
        assert_eq!(events[1].kind, CallEventKind::RecognizeCompleted);
        assert_eq!(events[1].recognized_label(), Some("en-US"));
        assert_eq!(
            events[2].kind,
            CallEventKind::Other("ParticipantsUpdated".to_string())
        );
    }

    #[test]
    fn test_contexts() {
        let events = CallEvent::parse_batch(BATCH).unwrap();
        assert!(events[0].has_context(OperationContext::Goodbye));
        assert!(!events[0].has_context(OperationContext::ConnectAgent));
        assert_eq!(
            events[1].contexts().unwrap().into_iter().collect::<Vec<_>>(),
            vec![OperationContext::IvrLangSelect]
        );
        assert!(events[2].contexts().unwrap().is_empty());
    }

    #[test]
    fn test_parse_single_without_data() {
        let event = CallEvent::parse(r#"{"type": "Microsoft.Communication.CallDisconnected"}"#).unwrap();
        assert_eq!(event.kind, CallEventKind::CallDisconnected);
        assert_eq!(event.call_connection_id, None);
    }

    #[test]
    fn test_transfer_failed() {
        let event = CallEvent::parse(
            r#"{"type": "Microsoft.Communication.CallTransferFailed",
                "data": {"operationContext": "[\"connect_agent\"]",
                         "resultInformation": {"code": 500, "subCode": 7000}}}"#,
        )
        .unwrap();
        assert_eq!(event.kind, CallEventKind::CallTransferFailed);
        assert!(event.has_context(OperationContext::ConnectAgent));
    }

    #[test]
    fn test_invalid_json() {
        assert!(CallEvent::parse_batch("not json").is_err());
    }
}
