//! Call media controller
//!
//! One controller per call session. Every operation goes through the
//! backend's call connection, translating failures with
//! [`crate::hangup::translate`]. Once the call is known to be gone the
//! controller is `Ended` and stops issuing requests.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;

use voicebot_config::Settings;
use voicebot_core::{CallSession, Error, Message, OperationContext, Result, SpeakingStyle};
use voicebot_persistence::MessageStore;
use voicebot_text_processing::{
    SpeechPayload, SpeechPayloadBuilder, SpeechTextPipeline, MAX_CHARACTERS_PER_TTS,
};
use voicebot_transport::{
    BackendError, CallAutomation, CallConnection, PlaySource, RecognitionChoice, RecognizeRequest,
};

use crate::context::encode_contexts;
use crate::hangup::{translate, HangupPolicy, MediaOperation};

/// Media state of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaState {
    Idle,
    /// Chunks of an utterance are being played
    Speaking,
    /// The call is gone; terminal
    Ended,
}

/// Controls playback, recognition, transfer and hang-up on one call
pub struct CallMediaController {
    call: Arc<CallSession>,
    automation: Arc<dyn CallAutomation>,
    store: Arc<dyn MessageStore>,
    payloads: SpeechPayloadBuilder,
    pipeline: SpeechTextPipeline,
    state: Mutex<MediaState>,
}

impl CallMediaController {
    pub fn new(
        call: Arc<CallSession>,
        automation: Arc<dyn CallAutomation>,
        store: Arc<dyn MessageStore>,
        payloads: SpeechPayloadBuilder,
    ) -> Self {
        let pipeline = SpeechTextPipeline::new(payloads.max_characters());
        Self {
            call,
            automation,
            store,
            payloads,
            pipeline,
            state: Mutex::new(MediaState::Idle),
        }
    }

    /// Controller using the lexicon published under the configured resources
    pub fn from_settings(
        call: Arc<CallSession>,
        automation: Arc<dyn CallAutomation>,
        store: Arc<dyn MessageStore>,
        settings: &Settings,
    ) -> Self {
        let payloads =
            SpeechPayloadBuilder::new(settings.resources.lexicon_url(), MAX_CHARACTERS_PER_TTS);
        Self::new(call, automation, store, payloads)
    }

    pub fn call(&self) -> &CallSession {
        &self.call
    }

    pub fn state(&self) -> MediaState {
        *self.state.lock()
    }

    pub fn is_ended(&self) -> bool {
        self.state() == MediaState::Ended
    }

    /// Say a text to the call
    ///
    /// The text is sanitized, recorded as one assistant message when `store`
    /// is set, then played chunk by chunk. Returns `false` as soon as a
    /// chunk could not be played because the call ended.
    pub async fn speak(
        &self,
        text: &str,
        style: SpeakingStyle,
        context: Option<OperationContext>,
        store: bool,
    ) -> Result<bool> {
        tracing::info!(call_id = %self.call.call_id, text, "Playing TTS");

        if self.is_ended() {
            return self.call_ended(MediaOperation::Speak).map(|()| false);
        }
        self.call.connection_id()?;

        let prepared = self.pipeline.prepare(text);
        if store {
            self.store_message(&prepared.text, style).await?;
        }
        let operation_context = encode_contexts(context)?;

        self.transition(MediaState::Idle, MediaState::Speaking);
        let result = self
            .play_chunks(&prepared.chunks, style, operation_context)
            .await;
        self.transition(MediaState::Speaking, MediaState::Idle);
        result
    }

    async fn play_chunks(
        &self,
        chunks: &[String],
        style: SpeakingStyle,
        operation_context: Option<String>,
    ) -> Result<bool> {
        for (index, chunk) in chunks.iter().enumerate() {
            let payload = self
                .payloads
                .build(chunk, &self.call.lang, self.call.prosody_rate, style);
            let played = self
                .play_payload(MediaOperation::Speak, &payload, operation_context.clone())
                .await?;
            if !played {
                tracing::debug!(
                    call_id = %self.call.call_id,
                    chunk = index + 1,
                    total = chunks.len(),
                    "Call hung up before playing"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Play one prepared payload
    pub async fn play_chunk(
        &self,
        payload: &SpeechPayload,
        context: Option<OperationContext>,
    ) -> Result<bool> {
        let operation_context = encode_contexts(context)?;
        self.play_payload(MediaOperation::PlayChunk, payload, operation_context)
            .await
    }

    async fn play_payload(
        &self,
        operation: MediaOperation,
        payload: &SpeechPayload,
        operation_context: Option<String>,
    ) -> Result<bool> {
        let source = PlaySource::ssml(payload.to_ssml(), payload.custom_voice_endpoint_id.clone());
        self.run(operation, |connection| async move {
            connection.play_media(source, operation_context).await
        })
        .await
    }

    /// Play an audio file
    pub async fn play_file(
        &self,
        sound_url: &str,
        context: Option<OperationContext>,
    ) -> Result<()> {
        tracing::info!(call_id = %self.call.call_id, sound_url, "Playing media");
        let source = PlaySource::file(sound_url);
        let operation_context = encode_contexts(context)?;
        self.run(MediaOperation::PlayFile, |connection| async move {
            connection.play_media(source, operation_context).await
        })
        .await
        .map(|_| ())
    }

    /// Cancel queued and ongoing media
    pub async fn clear_queue(&self) -> Result<()> {
        tracing::debug!(call_id = %self.call.call_id, "Clearing media queue");
        self.run(MediaOperation::ClearQueue, |connection| async move {
            connection.cancel_all_media_operations().await
        })
        .await
        .map(|_| ())
    }

    /// Play a prompt then listen for one of `choices`
    ///
    /// The caller can interrupt the prompt by speaking. Recognition runs in
    /// the call language against the caller's number.
    pub async fn recognize_choice(
        &self,
        choices: Vec<RecognitionChoice>,
        prompt_text: &str,
        context: Option<OperationContext>,
    ) -> Result<()> {
        tracing::info!(call_id = %self.call.call_id, prompt_text, "Recognizing IVR");
        let prompt = self.payloads.build(
            prompt_text,
            &self.call.lang,
            self.call.prosody_rate,
            SpeakingStyle::None,
        );
        let request = RecognizeRequest {
            choices,
            play_prompt: PlaySource::ssml(prompt.to_ssml(), prompt.custom_voice_endpoint_id.clone()),
            speech_language: self.call.lang.short_code.clone(),
            target_participant: self.call.phone_number.clone(),
            interrupt_prompt: true,
            operation_context: encode_contexts(context)?,
        };
        self.run(MediaOperation::RecognizeChoice, |connection| async move {
            connection.start_recognizing(request).await
        })
        .await
        .map(|_| ())
    }

    /// Transfer the call to `target`
    pub async fn transfer(&self, target: &str, context: Option<OperationContext>) -> Result<()> {
        tracing::info!(call_id = %self.call.call_id, target, "Transferring call");
        let operation_context = encode_contexts(context)?;
        self.run(MediaOperation::Transfer, |connection| async move {
            connection
                .transfer_to_participant(target, operation_context)
                .await
        })
        .await
        .map(|_| ())
    }

    /// End the call for everyone. Calling it again is a no-op.
    pub async fn hang_up(&self) -> Result<()> {
        tracing::info!(
            call_id = %self.call.call_id,
            phone_number = %self.call.phone_number,
            "Hanging up"
        );
        let done = self
            .run(MediaOperation::HangUp, |connection| async move {
                connection.hang_up(true).await
            })
            .await?;
        if done {
            self.mark_ended();
        }
        Ok(())
    }

    pub async fn start_streaming(&self) -> Result<()> {
        tracing::info!(call_id = %self.call.call_id, "Starting audio streaming");
        self.run(MediaOperation::StartStreaming, |connection| async move {
            connection.start_media_streaming().await
        })
        .await
        .map(|_| ())
    }

    pub async fn stop_streaming(&self) -> Result<()> {
        tracing::info!(call_id = %self.call.call_id, "Stopping audio streaming");
        self.run(MediaOperation::StopStreaming, |connection| async move {
            connection.stop_media_streaming().await
        })
        .await
        .map(|_| ())
    }

    /// Issue one backend request
    ///
    /// `Ok(true)` when done, `Ok(false)` when the call ended and the
    /// operation swallows it.
    async fn run<F, Fut>(&self, operation: MediaOperation, action: F) -> Result<bool>
    where
        F: FnOnce(Arc<dyn CallConnection>) -> Fut,
        Fut: Future<Output = std::result::Result<(), BackendError>>,
    {
        if self.is_ended() {
            return self.call_ended(operation).map(|()| false);
        }

        let connection_id = self.call.connection_id()?;
        let connection = self.automation.call_connection(connection_id);

        match action(connection).await {
            Ok(()) => Ok(true),
            Err(error) => match translate(error) {
                Error::CallEnded => {
                    self.mark_ended();
                    self.call_ended(operation).map(|()| false)
                }
                other => {
                    tracing::warn!(
                        call_id = %self.call.call_id,
                        connection_id,
                        operation = %operation,
                        error = %other,
                        "Call operation failed"
                    );
                    Err(other)
                }
            },
        }
    }

    fn call_ended(&self, operation: MediaOperation) -> Result<()> {
        match operation.hangup_policy() {
            HangupPolicy::Swallow => {
                tracing::debug!(call_id = %self.call.call_id, operation = %operation, "Call hung up");
                Ok(())
            }
            HangupPolicy::Escalate => Err(Error::CallEnded),
        }
    }

    fn mark_ended(&self) {
        *self.state.lock() = MediaState::Ended;
    }

    fn transition(&self, from: MediaState, to: MediaState) {
        let mut state = self.state.lock();
        if *state == from {
            *state = to;
        }
    }

    async fn store_message(&self, text: &str, style: SpeakingStyle) -> Result<()> {
        let mut transaction = self.store.begin(self.call.call_id).await?;
        transaction.append(Message::assistant(text, style));
        transaction.commit().await?;
        Ok(())
    }
}
