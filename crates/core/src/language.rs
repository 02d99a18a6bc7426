//! Call language settings
//!
//! A call speaks one language at a time. The settings carry everything the
//! speech markup and the recognizer need: BCP-47 short code, neural voice
//! name, and an optional custom voice deployment.

use serde::{Deserialize, Serialize};

/// Language settings of a call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallLanguage {
    /// BCP-47 code, e.g. `fr-FR`
    pub short_code: String,
    /// Human-readable name
    #[serde(default)]
    pub display_name: String,
    /// How a caller would say the language name, used by the IVR menu
    #[serde(default)]
    pub pronunciations_en: Vec<String>,
    /// Neural voice name
    pub voice: String,
    /// Custom voice deployment, if the voice is not a stock one
    #[serde(default)]
    pub custom_voice_endpoint_id: Option<String>,
}

impl Default for CallLanguage {
    fn default() -> Self {
        Self {
            short_code: "fr-FR".to_string(),
            display_name: "French (France)".to_string(),
            pronunciations_en: vec!["French".to_string(), "FR".to_string(), "France".to_string()],
            voice: "fr-FR-DeniseNeural".to_string(),
            custom_voice_endpoint_id: None,
        }
    }
}

impl CallLanguage {
    /// Create language settings from a short code and a voice name
    pub fn new(short_code: impl Into<String>, voice: impl Into<String>) -> Self {
        let short_code = short_code.into();
        Self {
            display_name: short_code.clone(),
            short_code,
            pronunciations_en: Vec::new(),
            voice: voice.into(),
            custom_voice_endpoint_id: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_pronunciations(mut self, pronunciations: Vec<String>) -> Self {
        self.pronunciations_en = pronunciations;
        self
    }

    pub fn with_custom_voice_endpoint(mut self, endpoint_id: impl Into<String>) -> Self {
        self.custom_voice_endpoint_id = Some(endpoint_id.into());
        self
    }
}
