//! Speech payload (SSML) construction
//!
//! See: https://learn.microsoft.com/en-us/azure/ai-services/speech-service/speech-synthesis-markup-structure

use serde::{Deserialize, Serialize};
use voicebot_core::{CallLanguage, SpeakingStyle};

/// Acoustic effect applied to every voice, tuned for 8 kHz telephony
pub const VOICE_EFFECT: &str = "eq_telecomhp8k";

/// Intensity of the expressive style
pub const STYLE_DEGREE: &str = "0.5";

/// Everything the speech markup template needs for one utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechPayload {
    /// BCP-47 language code
    pub language: String,
    /// Neural voice name
    pub voice: String,
    /// Custom voice deployment, if any
    pub custom_voice_endpoint_id: Option<String>,
    pub lexicon_url: String,
    pub style: SpeakingStyle,
    /// Prosody rate, formatted for the markup
    pub prosody_rate: String,
    /// Escaped, bounded text
    pub text: String,
    /// Whether the text was cut to fit the limit
    pub truncated: bool,
}

impl SpeechPayload {
    /// Render the SSML document
    pub fn to_ssml(&self) -> String {
        format!(
            concat!(
                r#"<speak version="1.0" xmlns="http://www.w3.org/2001/10/synthesis" xmlns:mstts="https://www.w3.org/2001/mstts" xml:lang="{lang}">"#,
                r#"<voice name="{voice}" effect="{effect}">"#,
                r#"<lexicon uri="{lexicon}" />"#,
                r#"<lang xml:lang="{lang}">"#,
                r#"<mstts:express-as style="{style}" styledegree="{degree}">"#,
                r#"<prosody rate="{rate}">{text}</prosody>"#,
                r#"</mstts:express-as>"#,
                r#"</lang>"#,
                r#"</voice>"#,
                r#"</speak>"#,
            ),
            lang = escape_xml(&self.language),
            voice = escape_xml(&self.voice),
            effect = VOICE_EFFECT,
            lexicon = escape_xml(&self.lexicon_url),
            style = self.style.as_str(),
            degree = STYLE_DEGREE,
            rate = escape_xml(&self.prosody_rate),
            text = self.text,
        )
    }
}

/// Escape markup characters
///
/// `&` goes first so the entities introduced for `<` and `>` are not
/// escaped again.
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Builds speech payloads for one deployment
#[derive(Debug, Clone)]
pub struct SpeechPayloadBuilder {
    lexicon_url: String,
    max_characters: usize,
}

impl SpeechPayloadBuilder {
    pub fn new(lexicon_url: impl Into<String>, max_characters: usize) -> Self {
        Self {
            lexicon_url: lexicon_url.into(),
            max_characters,
        }
    }

    pub fn max_characters(&self) -> usize {
        self.max_characters
    }

    /// Build the payload for one chunk
    ///
    /// Text over the limit is truncated with a warning. Chunking should
    /// prevent it, but a long sentence without punctuation still gets here.
    pub fn build(
        &self,
        text: &str,
        language: &CallLanguage,
        prosody_rate: f32,
        style: SpeakingStyle,
    ) -> SpeechPayload {
        let length = text.chars().count();
        let truncated = length > self.max_characters;
        let bounded: String = if truncated {
            tracing::warn!(
                length,
                limit = self.max_characters,
                "Text is too long to be processed by TTS, truncating"
            );
            text.chars().take(self.max_characters).collect()
        } else {
            text.to_string()
        };

        SpeechPayload {
            language: language.short_code.clone(),
            voice: language.voice.clone(),
            custom_voice_endpoint_id: language.custom_voice_endpoint_id.clone(),
            lexicon_url: self.lexicon_url.clone(),
            style,
            prosody_rate: format!("{:.2}", prosody_rate),
            text: escape_xml(&bounded),
            truncated,
        }
    }
}
