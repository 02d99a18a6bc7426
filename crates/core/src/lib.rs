//! Core types for the voice-bot call-media layer
//!
//! This crate provides foundational types used across all other crates:
//! - Call session and language settings
//! - Speaking styles and operation contexts
//! - Message history types
//! - Error types

pub mod call;
pub mod context;
pub mod error;
pub mod language;
pub mod message;
pub mod style;

pub use call::CallSession;
pub use context::OperationContext;
pub use error::{Error, Result};
pub use language::CallLanguage;
pub use message::{Message, Persona};
pub use style::SpeakingStyle;
