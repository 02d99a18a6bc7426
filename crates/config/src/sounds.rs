//! Static sounds played during a call

use serde::{Deserialize, Serialize};

use crate::ResourcesConfig;

/// Named audio files served from the public resources URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sound {
    /// Played while the bot is working
    Loading,
    /// Played when the caller can talk
    Ready,
}

impl Sound {
    pub fn file_name(&self) -> &'static str {
        match self {
            Sound::Loading => "loading.wav",
            Sound::Ready => "ready.wav",
        }
    }

    /// Resolve the sound to a URL the telephony backend can fetch
    pub fn url(&self, resources: &ResourcesConfig) -> String {
        resources.resolve(self.file_name())
    }
}
