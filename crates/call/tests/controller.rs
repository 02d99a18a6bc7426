//! Controller behavior against a recording backend

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use voicebot_call::{CallMediaController, HangupPolicy, IvrLanguageMenu, MediaOperation, MediaState};
use voicebot_config::ConversationConfig;
use voicebot_core::{CallLanguage, CallSession, Error, OperationContext, Persona, SpeakingStyle};
use voicebot_persistence::{InMemoryMessageStore, MessageStore};
use voicebot_text_processing::SpeechPayloadBuilder;
use voicebot_transport::{
    BackendError, CallAutomation, CallConnection, PlaySource, RecognizeRequest,
};

const LEXICON_URL: &str = "https://cdn.example.com/lexicon.xml";
const CONNECTION_ID: &str = "conn-1";

#[derive(Debug, Clone, PartialEq)]
enum Request {
    Play {
        source: PlaySource,
        operation_context: Option<String>,
    },
    CancelAll,
    Recognize(RecognizeRequest),
    HangUp {
        is_for_everyone: bool,
    },
    Transfer {
        target: String,
        operation_context: Option<String>,
    },
    StartStreaming,
    StopStreaming,
}

/// Records every request; fails the ones scripted by index
#[derive(Default)]
struct RecordingBackend {
    requests: Mutex<Vec<(String, Request)>>,
    failures: Mutex<HashMap<usize, BackendError>>,
    fail_all: Mutex<Option<BackendError>>,
}

impl RecordingBackend {
    fn fail_at(&self, index: usize, error: BackendError) {
        self.failures.lock().insert(index, error);
    }

    fn fail_always(&self, error: BackendError) {
        *self.fail_all.lock() = Some(error);
    }

    fn requests(&self) -> Vec<Request> {
        self.requests.lock().iter().map(|(_, r)| r.clone()).collect()
    }

    fn record(&self, connection_id: &str, request: Request) -> Result<(), BackendError> {
        let mut requests = self.requests.lock();
        let index = requests.len();
        requests.push((connection_id.to_string(), request));
        drop(requests);

        if let Some(error) = self.failures.lock().remove(&index) {
            return Err(error);
        }
        match self.fail_all.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

struct RecordingConnection {
    id: String,
    backend: Arc<RecordingBackend>,
}

#[async_trait]
impl CallConnection for RecordingConnection {
    fn call_connection_id(&self) -> &str {
        &self.id
    }

    async fn play_media(
        &self,
        source: PlaySource,
        operation_context: Option<String>,
    ) -> Result<(), BackendError> {
        self.backend.record(
            &self.id,
            Request::Play {
                source,
                operation_context,
            },
        )
    }

    async fn cancel_all_media_operations(&self) -> Result<(), BackendError> {
        self.backend.record(&self.id, Request::CancelAll)
    }

    async fn start_recognizing(&self, request: RecognizeRequest) -> Result<(), BackendError> {
        self.backend.record(&self.id, Request::Recognize(request))
    }

    async fn hang_up(&self, is_for_everyone: bool) -> Result<(), BackendError> {
        self.backend
            .record(&self.id, Request::HangUp { is_for_everyone })
    }

    async fn transfer_to_participant(
        &self,
        target_phone_number: &str,
        operation_context: Option<String>,
    ) -> Result<(), BackendError> {
        self.backend.record(
            &self.id,
            Request::Transfer {
                target: target_phone_number.to_string(),
                operation_context,
            },
        )
    }

    async fn start_media_streaming(&self) -> Result<(), BackendError> {
        self.backend.record(&self.id, Request::StartStreaming)
    }

    async fn stop_media_streaming(&self) -> Result<(), BackendError> {
        self.backend.record(&self.id, Request::StopStreaming)
    }
}

struct RecordingAutomation {
    backend: Arc<RecordingBackend>,
}

impl CallAutomation for RecordingAutomation {
    fn call_connection(&self, call_connection_id: &str) -> Arc<dyn CallConnection> {
        Arc::new(RecordingConnection {
            id: call_connection_id.to_string(),
            backend: Arc::clone(&self.backend),
        })
    }
}

struct Harness {
    backend: Arc<RecordingBackend>,
    store: Arc<InMemoryMessageStore>,
    controller: CallMediaController,
}

impl Harness {
    fn new() -> Self {
        Self::with_call(
            CallSession::new("+33612345678", CallLanguage::default().with_custom_voice_endpoint("cv-1"))
                .with_voice_id(CONNECTION_ID),
        )
    }

    fn with_call(call: CallSession) -> Self {
        let backend = Arc::new(RecordingBackend::default());
        let store = Arc::new(InMemoryMessageStore::new());
        let controller = CallMediaController::new(
            Arc::new(call),
            Arc::new(RecordingAutomation {
                backend: Arc::clone(&backend),
            }),
            Arc::clone(&store) as Arc<dyn MessageStore>,
            SpeechPayloadBuilder::new(LEXICON_URL, 400),
        );
        Self {
            backend,
            store,
            controller,
        }
    }

    async fn stored_messages(&self) -> Vec<voicebot_core::Message> {
        self.store
            .messages(self.controller.call().call_id)
            .await
            .unwrap()
    }
}

fn not_found() -> BackendError {
    BackendError::NotFound("Call not found".to_string())
}

fn already_terminated() -> BackendError {
    BackendError::RequestFailed {
        status: 400,
        message: "Call already terminated.".to_string(),
    }
}

/// Three sentences of 250 characters, no two fit in one chunk
fn three_chunk_text() -> String {
    let sentence = format!("{}.", "a".repeat(249));
    vec![sentence.clone(), sentence.clone(), sentence].join(" ")
}

/// Run an operation; unit results report whether the call is still up
async fn run_operation(controller: &CallMediaController, operation: MediaOperation) -> voicebot_core::Result<bool> {
    match operation {
        MediaOperation::Speak => {
            controller
                .speak("Bonjour.", SpeakingStyle::None, None, false)
                .await
        }
        MediaOperation::PlayChunk => {
            let payload = SpeechPayloadBuilder::new(LEXICON_URL, 400).build(
                "Bonjour.",
                &controller.call().lang,
                1.0,
                SpeakingStyle::None,
            );
            controller.play_chunk(&payload, None).await
        }
        MediaOperation::PlayFile => controller
            .play_file("https://cdn.example.com/ready.wav", None)
            .await
            .map(|()| !controller.is_ended()),
        MediaOperation::ClearQueue => controller.clear_queue().await.map(|()| !controller.is_ended()),
        MediaOperation::RecognizeChoice => controller
            .recognize_choice(Vec::new(), "Choisissez.", None)
            .await
            .map(|()| !controller.is_ended()),
        MediaOperation::Transfer => controller
            .transfer("+33100000000", None)
            .await
            .map(|()| !controller.is_ended()),
        MediaOperation::HangUp => controller.hang_up().await.map(|()| !controller.is_ended()),
        MediaOperation::StartStreaming => controller.start_streaming().await.map(|()| !controller.is_ended()),
        MediaOperation::StopStreaming => controller.stop_streaming().await.map(|()| !controller.is_ended()),
    }
}

#[tokio::test]
async fn test_speak_plays_and_stores_one_message() {
    let harness = Harness::new();

    let played = harness
        .controller
        .speak(
            "Bonjour <b>Marie</b> ! Comment allez-vous ?",
            SpeakingStyle::Cheerful,
            Some(OperationContext::Goodbye),
            true,
        )
        .await
        .unwrap();
    assert!(played);

    let messages = harness.stored_messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].persona, Persona::Assistant);
    assert_eq!(messages[0].style, SpeakingStyle::Cheerful);
    assert_eq!(messages[0].content, "Bonjour b Marie /b ! Comment allez-vous ?");

    let requests = harness.backend.requests();
    assert_eq!(requests.len(), 1);
    match &requests[0] {
        Request::Play {
            source:
                PlaySource::Ssml {
                    ssml_text,
                    custom_voice_endpoint_id,
                },
            operation_context,
        } => {
            assert!(ssml_text.contains("Bonjour b Marie /b! Comment allez-vous?"));
            assert!(ssml_text.contains(r#"style="cheerful""#));
            assert!(ssml_text.contains(LEXICON_URL));
            assert_eq!(custom_voice_endpoint_id.as_deref(), Some("cv-1"));
            assert_eq!(operation_context.as_deref(), Some(r#"["goodbye"]"#));
        }
        other => panic!("unexpected request {:?}", other),
    }
    assert_eq!(harness.controller.state(), MediaState::Idle);
}

#[tokio::test]
async fn test_speak_without_store_keeps_history_empty() {
    let harness = Harness::new();
    assert!(harness
        .controller
        .speak("Un instant.", SpeakingStyle::None, None, false)
        .await
        .unwrap());
    assert!(harness.stored_messages().await.is_empty());

    match &harness.backend.requests()[0] {
        Request::Play {
            operation_context, ..
        } => assert_eq!(*operation_context, None),
        other => panic!("unexpected request {:?}", other),
    }
}

#[tokio::test]
async fn test_chunks_play_in_order() {
    let harness = Harness::new();
    assert!(harness
        .controller
        .speak(&three_chunk_text(), SpeakingStyle::None, None, true)
        .await
        .unwrap());

    let requests = harness.backend.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests
        .iter()
        .all(|r| matches!(r, Request::Play { .. })));
    assert_eq!(harness.stored_messages().await.len(), 1);
}

#[tokio::test]
async fn test_call_ended_on_second_chunk_aborts() {
    for error in [not_found(), already_terminated()] {
        let harness = Harness::new();
        harness.backend.fail_at(1, error);

        let played = harness
            .controller
            .speak(&three_chunk_text(), SpeakingStyle::None, None, true)
            .await
            .unwrap();

        assert!(!played);
        assert_eq!(harness.backend.requests().len(), 2);
        assert_eq!(harness.controller.state(), MediaState::Ended);
        // The message is recorded before playback
        assert_eq!(harness.stored_messages().await.len(), 1);
    }
}

#[tokio::test]
async fn test_both_hangup_signals_are_equivalent_for_every_operation() {
    for operation in MediaOperation::ALL {
        for error in [not_found(), already_terminated()] {
            let harness = Harness::new();
            harness.backend.fail_always(error.clone());

            let result = run_operation(&harness.controller, operation).await;
            match operation.hangup_policy() {
                HangupPolicy::Swallow => {
                    assert!(
                        matches!(result, Ok(false)),
                        "{} with {:?}: {:?}",
                        operation,
                        error,
                        result
                    );
                }
                HangupPolicy::Escalate => {
                    assert!(
                        matches!(result, Err(Error::CallEnded)),
                        "{} with {:?}: {:?}",
                        operation,
                        error,
                        result
                    );
                }
            }
            assert_eq!(harness.controller.state(), MediaState::Ended);
        }
    }
}

#[tokio::test]
async fn test_other_failures_propagate_unmodified() {
    for operation in MediaOperation::ALL {
        let harness = Harness::new();
        harness.backend.fail_always(BackendError::RequestFailed {
            status: 500,
            message: "Internal server error".to_string(),
        });

        match run_operation(&harness.controller, operation).await {
            Err(Error::Backend { status, message }) => {
                assert_eq!(status, Some(500));
                assert_eq!(message, "Internal server error");
            }
            other => panic!("{}: unexpected {:?}", operation, other),
        }
        assert_ne!(harness.controller.state(), MediaState::Ended);
    }
}

#[tokio::test]
async fn test_hang_up_is_idempotent() {
    let harness = Harness::new();

    harness.controller.hang_up().await.unwrap();
    harness.controller.hang_up().await.unwrap();

    assert_eq!(
        harness.backend.requests(),
        vec![Request::HangUp {
            is_for_everyone: true
        }]
    );
    assert!(harness.controller.is_ended());
}

#[tokio::test]
async fn test_hang_up_on_ended_call_is_swallowed() {
    let harness = Harness::new();
    harness.backend.fail_always(not_found());
    harness.controller.hang_up().await.unwrap();
    harness.controller.hang_up().await.unwrap();
    assert_eq!(harness.backend.requests().len(), 1);
}

#[tokio::test]
async fn test_no_requests_after_call_ended() {
    let harness = Harness::new();
    harness.backend.fail_at(0, already_terminated());
    harness.controller.clear_queue().await.unwrap();
    assert!(harness.controller.is_ended());

    assert!(!harness
        .controller
        .speak("Encore là ?", SpeakingStyle::None, None, true)
        .await
        .unwrap());
    assert!(matches!(
        harness.controller.transfer("+33100000000", None).await,
        Err(Error::CallEnded)
    ));
    assert!(matches!(
        harness.controller.start_streaming().await,
        Err(Error::CallEnded)
    ));

    assert_eq!(harness.backend.requests(), vec![Request::CancelAll]);
    assert!(harness.stored_messages().await.is_empty());
}

#[tokio::test]
async fn test_missing_voice_id_is_validation_error() {
    let harness = Harness::with_call(CallSession::new("+33612345678", CallLanguage::default()));

    for operation in MediaOperation::ALL {
        let result = run_operation(&harness.controller, operation).await;
        assert!(
            matches!(result, Err(Error::Validation(_))),
            "{}: {:?}",
            operation,
            result
        );
    }

    assert!(matches!(
        harness
            .controller
            .speak("Bonjour.", SpeakingStyle::None, None, true)
            .await,
        Err(Error::Validation(_))
    ));
    assert!(harness.backend.requests().is_empty());
    assert!(harness.stored_messages().await.is_empty());
    assert_eq!(harness.controller.state(), MediaState::Idle);
}

#[tokio::test]
async fn test_requests_target_the_call_connection() {
    let harness = Harness::new();
    harness.controller.start_streaming().await.unwrap();
    harness.controller.stop_streaming().await.unwrap();

    let ids: Vec<_> = harness
        .backend
        .requests
        .lock()
        .iter()
        .map(|(id, _)| id.clone())
        .collect();
    assert_eq!(ids, vec![CONNECTION_ID, CONNECTION_ID]);
}

#[tokio::test]
async fn test_transfer_and_play_file_requests() {
    let harness = Harness::new();
    harness
        .controller
        .transfer("+33100000000", Some(OperationContext::ConnectAgent))
        .await
        .unwrap();
    harness
        .controller
        .play_file("https://cdn.example.com/loading.wav", None)
        .await
        .unwrap();

    assert_eq!(
        harness.backend.requests(),
        vec![
            Request::Transfer {
                target: "+33100000000".to_string(),
                operation_context: Some(r#"["connect_agent"]"#.to_string()),
            },
            Request::Play {
                source: PlaySource::file("https://cdn.example.com/loading.wav"),
                operation_context: None,
            },
        ]
    );
}

#[tokio::test]
async fn test_ivr_menu_recognition_request() {
    let harness = Harness::new();
    let menu = IvrLanguageMenu::from_config(&ConversationConfig::default());
    menu.ask(&harness.controller).await.unwrap();

    let requests = harness.backend.requests();
    let request = match &requests[0] {
        Request::Recognize(request) => request,
        other => panic!("unexpected request {:?}", other),
    };
    assert_eq!(request.target_participant, "+33612345678");
    assert_eq!(request.speech_language, "fr-FR");
    assert!(request.interrupt_prompt);
    assert_eq!(request.choices.len(), 3);
    assert_eq!(
        request.operation_context.as_deref(),
        Some(r#"["ivr_lang_select"]"#)
    );
    match &request.play_prompt {
        PlaySource::Ssml { ssml_text, .. } => {
            assert!(ssml_text.contains(r#"style="none""#));
            assert!(ssml_text.contains("say French or press 1."));
        }
        other => panic!("unexpected prompt {:?}", other),
    }
    // Recognition does not touch the message history
    assert!(harness.stored_messages().await.is_empty());
}
