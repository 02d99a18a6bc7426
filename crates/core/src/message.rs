//! Call message history types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SpeakingStyle;

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Caller speech
    Human,
    /// Bot speech
    Assistant,
    /// Tool output
    Tool,
}

impl Persona {
    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Human => "human",
            Persona::Assistant => "assistant",
            Persona::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of a call's message history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
    pub persona: Persona,
    #[serde(default)]
    pub style: SpeakingStyle,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(persona: Persona, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            persona,
            style: SpeakingStyle::None,
            created_at: Utc::now(),
        }
    }

    /// Create an assistant message spoken with the given style
    pub fn assistant(content: impl Into<String>, style: SpeakingStyle) -> Self {
        Self {
            style,
            ..Self::new(Persona::Assistant, content)
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::new(Persona::Human, content)
    }
}
