//! Call session view used by the media controller

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CallLanguage, Error, Result};

fn default_prosody_rate() -> f32 {
    1.0
}

/// An established telephony session
///
/// Owned by the call-control layer. The media controller only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSession {
    /// Internal call id, keys the message history
    pub call_id: Uuid,
    /// Call connection id assigned by the telephony backend
    #[serde(default)]
    pub voice_id: Option<String>,
    /// Caller phone number, in E.164
    pub phone_number: String,
    /// Current language of the call
    #[serde(default)]
    pub lang: CallLanguage,
    /// Speaking rate, 1.0 is normal
    #[serde(default = "default_prosody_rate")]
    pub prosody_rate: f32,
}

impl CallSession {
    pub fn new(phone_number: impl Into<String>, lang: CallLanguage) -> Self {
        Self {
            call_id: Uuid::new_v4(),
            voice_id: None,
            phone_number: phone_number.into(),
            lang,
            prosody_rate: default_prosody_rate(),
        }
    }

    pub fn with_voice_id(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = Some(voice_id.into());
        self
    }

    pub fn with_prosody_rate(mut self, rate: f32) -> Self {
        self.prosody_rate = rate;
        self
    }

    /// Connection id required to control the call
    pub fn connection_id(&self) -> Result<&str> {
        self.voice_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::validation("Voice ID is required to control the call"))
    }
}
