//! Media request types shared by every backend

use serde::{Deserialize, Serialize};

/// What to play into the call
#[derive(Debug, Clone, PartialEq)]
pub enum PlaySource {
    /// Synthesized speech from an SSML document
    Ssml {
        ssml_text: String,
        custom_voice_endpoint_id: Option<String>,
    },
    /// Audio file fetched by the backend
    File { url: String },
}

impl PlaySource {
    pub fn ssml(ssml_text: impl Into<String>, custom_voice_endpoint_id: Option<String>) -> Self {
        Self::Ssml {
            ssml_text: ssml_text.into(),
            custom_voice_endpoint_id,
        }
    }

    pub fn file(url: impl Into<String>) -> Self {
        Self::File { url: url.into() }
    }
}

/// DTMF key a caller can press instead of speaking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DtmfTone {
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Pound,
    Asterisk,
}

impl DtmfTone {
    /// Tone for a keypad digit
    pub fn from_digit(digit: u32) -> Option<Self> {
        Some(match digit {
            0 => Self::Zero,
            1 => Self::One,
            2 => Self::Two,
            3 => Self::Three,
            4 => Self::Four,
            5 => Self::Five,
            6 => Self::Six,
            7 => Self::Seven,
            8 => Self::Eight,
            9 => Self::Nine,
            _ => return None,
        })
    }
}

/// One option offered to the caller during choice recognition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionChoice {
    /// Value reported back when the choice is recognized
    pub label: String,
    /// Phrases the caller may say
    pub phrases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<DtmfTone>,
}

impl RecognitionChoice {
    pub fn new(label: impl Into<String>, phrases: Vec<String>) -> Self {
        Self {
            label: label.into(),
            phrases,
            tone: None,
        }
    }

    pub fn with_tone(mut self, tone: DtmfTone) -> Self {
        self.tone = Some(tone);
        self
    }
}

/// Start choice recognition on a call
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizeRequest {
    pub choices: Vec<RecognitionChoice>,
    /// Prompt played while listening
    pub play_prompt: PlaySource,
    /// Recognition locale, e.g. `fr-FR`
    pub speech_language: String,
    /// Phone number of the participant to listen to
    pub target_participant: String,
    /// Stop the prompt as soon as the caller speaks
    pub interrupt_prompt: bool,
    pub operation_context: Option<String>,
}
