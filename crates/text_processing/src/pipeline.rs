//! Text preparation pipeline for speech
//!
//! Order: sanitize → split into sentences → pack into chunks

use crate::{chunker::pack_chunks, sanitizer::sanitize, sentence::split_sentences};

/// Maximum characters per synthesized utterance
pub const MAX_CHARACTERS_PER_TTS: usize = 400;

/// Text ready to be synthesized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSpeech {
    /// Sanitized full text, as stored in the message history
    pub text: String,
    /// Chunks to play, in order
    pub chunks: Vec<String>,
}

/// Turns assistant text into playable chunks
#[derive(Debug, Clone)]
pub struct SpeechTextPipeline {
    max_characters: usize,
}

impl Default for SpeechTextPipeline {
    fn default() -> Self {
        Self::new(MAX_CHARACTERS_PER_TTS)
    }
}

impl SpeechTextPipeline {
    pub fn new(max_characters: usize) -> Self {
        Self { max_characters }
    }

    pub fn max_characters(&self) -> usize {
        self.max_characters
    }

    /// Prepare text for playback
    ///
    /// A trailing fragment without punctuation is kept, the text is complete.
    pub fn prepare(&self, text: &str) -> PreparedSpeech {
        let text = sanitize(text);
        let chunks = pack_chunks(split_sentences(&text, true), self.max_characters);
        PreparedSpeech { text, chunks }
    }
}
