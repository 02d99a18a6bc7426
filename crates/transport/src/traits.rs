//! Call automation backend traits

use async_trait::async_trait;
use std::sync::Arc;

use crate::{BackendError, PlaySource, RecognizeRequest};

/// Media and lifecycle control of one live call
#[async_trait]
pub trait CallConnection: Send + Sync {
    /// Backend identifier of the call
    fn call_connection_id(&self) -> &str;

    /// Play a source to every participant
    async fn play_media(
        &self,
        source: PlaySource,
        operation_context: Option<String>,
    ) -> Result<(), BackendError>;

    /// Cancel queued and ongoing playback and recognition
    async fn cancel_all_media_operations(&self) -> Result<(), BackendError>;

    async fn start_recognizing(&self, request: RecognizeRequest) -> Result<(), BackendError>;

    /// Leave the call, or end it for everyone
    async fn hang_up(&self, is_for_everyone: bool) -> Result<(), BackendError>;

    /// Transfer the call to a phone number
    async fn transfer_to_participant(
        &self,
        target_phone_number: &str,
        operation_context: Option<String>,
    ) -> Result<(), BackendError>;

    async fn start_media_streaming(&self) -> Result<(), BackendError>;

    async fn stop_media_streaming(&self) -> Result<(), BackendError>;
}

/// Factory of call connection handles
pub trait CallAutomation: Send + Sync {
    /// Handle on an existing call. No request is made until an operation is invoked.
    fn call_connection(&self, call_connection_id: &str) -> Arc<dyn CallConnection>;
}
