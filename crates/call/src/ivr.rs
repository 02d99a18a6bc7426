//! IVR language selection
//!
//! Offers the configured languages as recognition choices: the caller can
//! say a language name or press its digit.

use voicebot_config::ConversationConfig;
use voicebot_core::{CallLanguage, OperationContext, Result};
use voicebot_transport::{DtmfTone, RecognitionChoice};

use crate::events::{CallEvent, CallEventKind};
use crate::CallMediaController;

#[derive(Debug, Clone)]
pub struct IvrLanguageMenu {
    languages: Vec<CallLanguage>,
}

impl IvrLanguageMenu {
    pub fn new(languages: Vec<CallLanguage>) -> Self {
        Self { languages }
    }

    pub fn from_config(config: &ConversationConfig) -> Self {
        Self::new(config.languages.clone())
    }

    pub fn languages(&self) -> &[CallLanguage] {
        &self.languages
    }

    /// One choice per language, labeled with its short code
    ///
    /// Keypad digits start at 1; languages past the ninth can only be spoken.
    pub fn choices(&self) -> Vec<RecognitionChoice> {
        self.languages
            .iter()
            .enumerate()
            .map(|(index, lang)| {
                let phrases = if lang.pronunciations_en.is_empty() {
                    vec![lang.display_name.clone()]
                } else {
                    lang.pronunciations_en.clone()
                };
                let choice = RecognitionChoice::new(lang.short_code.clone(), phrases);
                match DtmfTone::from_digit(index as u32 + 1) {
                    Some(tone) => choice.with_tone(tone),
                    None => choice,
                }
            })
            .collect()
    }

    /// Spoken menu
    pub fn prompt(&self) -> String {
        self.languages
            .iter()
            .enumerate()
            .map(|(index, lang)| {
                let spoken = lang
                    .pronunciations_en
                    .first()
                    .unwrap_or(&lang.display_name);
                if index < 9 {
                    format!("For {}, say {} or press {}.", lang.display_name, spoken, index + 1)
                } else {
                    format!("For {}, say {}.", lang.display_name, spoken)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Language for a recognized label
    pub fn resolve(&self, label: &str) -> Option<&CallLanguage> {
        self.languages
            .iter()
            .find(|lang| lang.short_code.eq_ignore_ascii_case(label))
    }

    /// Language picked by the caller, if `event` answers this menu
    pub fn selection(&self, event: &CallEvent) -> Option<&CallLanguage> {
        if event.kind != CallEventKind::RecognizeCompleted
            || !event.has_context(OperationContext::IvrLangSelect)
        {
            return None;
        }
        event.recognized_label().and_then(|label| self.resolve(label))
    }

    /// Ask the caller to pick a language
    pub async fn ask(&self, controller: &CallMediaController) -> Result<()> {
        controller
            .recognize_choice(
                self.choices(),
                &self.prompt(),
                Some(OperationContext::IvrLangSelect),
            )
            .await
    }
}
