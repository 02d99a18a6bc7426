//! Request and response bodies of the call automation REST API

use serde::{Deserialize, Serialize};

use crate::{PlaySource, RecognitionChoice, RecognizeRequest};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WirePlaySource {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ssml: Option<SsmlSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<FileSource>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SsmlSource {
    ssml_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_voice_endpoint_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct FileSource {
    uri: String,
}

impl From<PlaySource> for WirePlaySource {
    fn from(source: PlaySource) -> Self {
        match source {
            PlaySource::Ssml {
                ssml_text,
                custom_voice_endpoint_id,
            } => Self {
                kind: "ssml",
                ssml: Some(SsmlSource {
                    ssml_text,
                    custom_voice_endpoint_id,
                }),
                file: None,
            },
            PlaySource::File { url } => Self {
                kind: "file",
                ssml: None,
                file: Some(FileSource { uri: url }),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommunicationIdentifier {
    raw_id: String,
    kind: &'static str,
    phone_number: PhoneNumber,
}

#[derive(Debug, Serialize)]
struct PhoneNumber {
    value: String,
}

impl CommunicationIdentifier {
    pub(crate) fn phone_number(number: &str) -> Self {
        Self {
            raw_id: format!("4:{}", number),
            kind: "phoneNumber",
            phone_number: PhoneNumber {
                value: number.to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PlayOptions {
    #[serde(rename = "loop")]
    looped: bool,
}

/// Body of `:play`. Without `playTo` the backend plays to every participant.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlayBody {
    play_sources: Vec<WirePlaySource>,
    play_options: PlayOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation_context: Option<String>,
}

impl PlayBody {
    pub(crate) fn new(source: PlaySource, operation_context: Option<String>) -> Self {
        Self {
            play_sources: vec![source.into()],
            play_options: PlayOptions { looped: false },
            operation_context,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeOptions {
    interrupt_prompt: bool,
    target_participant: CommunicationIdentifier,
    speech_language: String,
    choices: Vec<RecognitionChoice>,
}

/// Body of `:recognize`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecognizeBody {
    recognize_input_type: &'static str,
    play_prompt: WirePlaySource,
    interrupt_call_media_operation: bool,
    recognize_options: RecognizeOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation_context: Option<String>,
}

impl From<RecognizeRequest> for RecognizeBody {
    fn from(request: RecognizeRequest) -> Self {
        Self {
            recognize_input_type: "choices",
            play_prompt: request.play_prompt.into(),
            interrupt_call_media_operation: false,
            recognize_options: RecognizeOptions {
                interrupt_prompt: request.interrupt_prompt,
                target_participant: CommunicationIdentifier::phone_number(
                    &request.target_participant,
                ),
                speech_language: request.speech_language,
                choices: request.choices,
            },
            operation_context: request.operation_context,
        }
    }
}

/// Body of `:transferToParticipant`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransferBody {
    target_participant: CommunicationIdentifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation_context: Option<String>,
}

impl TransferBody {
    pub(crate) fn new(target_phone_number: &str, operation_context: Option<String>) -> Self {
        Self {
            target_participant: CommunicationIdentifier::phone_number(target_phone_number),
            operation_context,
        }
    }
}

/// Body of actions that take no parameters
#[derive(Debug, Default, Serialize)]
pub(crate) struct EmptyBody {}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Extract the human readable message of an error response body
pub(crate) fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|response| response.error.message)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
}
