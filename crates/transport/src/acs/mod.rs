//! REST client for the call automation service
//!
//! Every request is signed with the resource access key (see [`auth`]).
//! HTTP 404 is reported as [`BackendError::NotFound`]; any other non-2xx
//! response becomes [`BackendError::RequestFailed`] carrying the message
//! from the error body.

pub mod auth;
mod models;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use voicebot_config::CommunicationServicesConfig;

use self::auth::{http_date, AccessKeyCredential};
use self::models::{error_message, EmptyBody, PlayBody, RecognizeBody, TransferBody};
use crate::{BackendError, CallAutomation, CallConnection, PlaySource, RecognizeRequest, TransportError};

/// Client configuration
#[derive(Debug, Clone)]
pub struct AcsClientConfig {
    pub endpoint: String,
    /// Base64 access key
    pub access_key: String,
    pub api_version: String,
    pub request_timeout: Duration,
}

impl AcsClientConfig {
    pub fn from_settings(settings: &CommunicationServicesConfig) -> Result<Self, TransportError> {
        if settings.endpoint.trim().is_empty() {
            return Err(TransportError::Configuration(
                "communication_services.endpoint is required".to_string(),
            ));
        }
        let access_key = settings.access_key.clone().ok_or_else(|| {
            TransportError::Configuration("communication_services.access_key is required".to_string())
        })?;

        Ok(Self {
            endpoint: settings.endpoint.clone(),
            access_key,
            api_version: settings.api_version.clone(),
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
        })
    }
}

struct AcsInner {
    http: reqwest::Client,
    endpoint: Url,
    api_version: String,
    credential: AccessKeyCredential,
}

/// Call automation over the REST API
#[derive(Clone)]
pub struct AcsCallAutomation {
    inner: Arc<AcsInner>,
}

impl AcsCallAutomation {
    pub fn new(config: AcsClientConfig) -> Result<Self, TransportError> {
        let endpoint = Url::parse(&config.endpoint)?;
        if endpoint.cannot_be_a_base() {
            return Err(TransportError::Configuration(format!(
                "endpoint cannot be used as a base URL: {}",
                config.endpoint
            )));
        }
        let credential = AccessKeyCredential::from_base64(&config.access_key)?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        tracing::debug!(endpoint = %endpoint, api_version = %config.api_version, "Call automation client ready");

        Ok(Self {
            inner: Arc::new(AcsInner {
                http,
                endpoint,
                api_version: config.api_version,
                credential,
            }),
        })
    }

    pub fn from_settings(settings: &CommunicationServicesConfig) -> Result<Self, TransportError> {
        Self::new(AcsClientConfig::from_settings(settings)?)
    }
}

impl CallAutomation for AcsCallAutomation {
    fn call_connection(&self, call_connection_id: &str) -> Arc<dyn CallConnection> {
        Arc::new(AcsCallConnection {
            inner: Arc::clone(&self.inner),
            call_connection_id: call_connection_id.to_string(),
        })
    }
}

/// Handle on one call
pub struct AcsCallConnection {
    inner: Arc<AcsInner>,
    call_connection_id: String,
}

impl AcsCallConnection {
    fn url(&self, action: Option<&str>) -> Result<Url, BackendError> {
        connection_url(
            &self.inner.endpoint,
            &self.inner.api_version,
            &self.call_connection_id,
            action,
        )
    }

    async fn post<T: Serialize>(&self, action: &str, body: &T) -> Result<(), BackendError> {
        let url = self.url(Some(action))?;
        let body = serde_json::to_vec(body)?;
        self.send(Method::POST, url, body).await
    }

    async fn send(&self, method: Method, url: Url, body: Vec<u8>) -> Result<(), BackendError> {
        let date = http_date(Utc::now());
        let signed = self.inner.credential.sign(method.as_str(), &url, &body, &date);

        let mut request = self
            .inner
            .http
            .request(method.clone(), url.clone())
            .header("x-ms-date", signed.date)
            .header("x-ms-content-sha256", signed.content_hash)
            .header(AUTHORIZATION, signed.authorization);
        if !body.is_empty() {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            tracing::trace!(%method, path = url.path(), status = status.as_u16(), "Call automation request succeeded");
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        let error = classify_failure(status, &text);
        tracing::debug!(
            %method,
            path = url.path(),
            status = status.as_u16(),
            error = %error,
            "Call automation request failed"
        );
        Err(error)
    }
}

#[async_trait]
impl CallConnection for AcsCallConnection {
    fn call_connection_id(&self) -> &str {
        &self.call_connection_id
    }

    async fn play_media(
        &self,
        source: PlaySource,
        operation_context: Option<String>,
    ) -> Result<(), BackendError> {
        self.post("play", &PlayBody::new(source, operation_context)).await
    }

    async fn cancel_all_media_operations(&self) -> Result<(), BackendError> {
        self.post("cancelAllMediaOperations", &EmptyBody::default()).await
    }

    async fn start_recognizing(&self, request: RecognizeRequest) -> Result<(), BackendError> {
        self.post("recognize", &RecognizeBody::from(request)).await
    }

    async fn hang_up(&self, is_for_everyone: bool) -> Result<(), BackendError> {
        if is_for_everyone {
            self.post("terminate", &EmptyBody::default()).await
        } else {
            let url = self.url(None)?;
            self.send(Method::DELETE, url, Vec::new()).await
        }
    }

    async fn transfer_to_participant(
        &self,
        target_phone_number: &str,
        operation_context: Option<String>,
    ) -> Result<(), BackendError> {
        self.post(
            "transferToParticipant",
            &TransferBody::new(target_phone_number, operation_context),
        )
        .await
    }

    async fn start_media_streaming(&self) -> Result<(), BackendError> {
        self.post("startMediaStreaming", &EmptyBody::default()).await
    }

    async fn stop_media_streaming(&self) -> Result<(), BackendError> {
        self.post("stopMediaStreaming", &EmptyBody::default()).await
    }
}

/// `{endpoint}/calling/callConnections/{id}[:{action}]?api-version=...`
fn connection_url(
    endpoint: &Url,
    api_version: &str,
    call_connection_id: &str,
    action: Option<&str>,
) -> Result<Url, BackendError> {
    let mut url = endpoint.clone();
    let segment = match action {
        Some(action) => format!("{}:{}", call_connection_id, action),
        None => call_connection_id.to_string(),
    };
    url.path_segments_mut()
        .map_err(|_| BackendError::Transport(format!("invalid endpoint: {}", endpoint)))?
        .pop_if_empty()
        .extend(["calling", "callConnections", segment.as_str()]);
    url.set_query(None);
    url.query_pairs_mut().append_pair("api-version", api_version);
    Ok(url)
}

/// Map a non-2xx response to a backend error
pub fn classify_failure(status: StatusCode, body: &str) -> BackendError {
    let message = error_message(body).unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        } else {
            trimmed.to_string()
        }
    });

    if status == StatusCode::NOT_FOUND {
        BackendError::NotFound(message)
    } else {
        BackendError::RequestFailed {
            status: status.as_u16(),
            message,
        }
    }
}
