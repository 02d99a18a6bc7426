//! Speaking styles for expressive synthesis

use serde::{Deserialize, Serialize};

/// Expressive rendering mode, chosen per utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpeakingStyle {
    #[default]
    None,
    Cheerful,
    Empathetic,
    Sad,
}

impl SpeakingStyle {
    /// Style name as the speech backend expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Cheerful => "cheerful",
            Self::Empathetic => "empathetic",
            Self::Sad => "sad",
        }
    }
}

impl std::fmt::Display for SpeakingStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
