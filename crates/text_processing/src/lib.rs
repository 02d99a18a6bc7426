//! Text preparation for speech synthesis
//!
//! This crate turns assistant text into what the speech backend can play:
//! - **Sanitizing**: strip unsupported characters, collapse whitespace
//! - **Sentence splitting**: punctuation-aware, decimals and hyphens kept
//! - **Chunking**: pack sentences under the per-utterance limit
//! - **SSML**: escape and wrap a chunk in the speech markup
//!
//! # Example
//!
//! ```
//! use voicebot_core::{CallLanguage, SpeakingStyle};
//! use voicebot_text_processing::{SpeechPayloadBuilder, SpeechTextPipeline, MAX_CHARACTERS_PER_TTS};
//!
//! let prepared = SpeechTextPipeline::default().prepare("Bonjour ! Comment allez-vous ?");
//! let builder = SpeechPayloadBuilder::new("https://cdn.example.com/lexicon.xml", MAX_CHARACTERS_PER_TTS);
//! for chunk in &prepared.chunks {
//!     let payload = builder.build(chunk, &CallLanguage::default(), 1.0, SpeakingStyle::None);
//!     assert!(payload.to_ssml().contains("fr-FR-DeniseNeural"));
//! }
//! ```

pub mod chunker;
pub mod pipeline;
pub mod sanitizer;
pub mod sentence;
pub mod ssml;

pub use chunker::pack_chunks;
pub use pipeline::{PreparedSpeech, SpeechTextPipeline, MAX_CHARACTERS_PER_TTS};
pub use sanitizer::sanitize;
pub use sentence::{split_sentences, SentenceUnit, Sentences};
pub use ssml::{escape_xml, SpeechPayload, SpeechPayloadBuilder};
