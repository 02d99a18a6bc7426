//! Call media control for the voicebot
//!
//! [`CallMediaController`] drives one call: it speaks text in chunks the
//! synthesizer accepts, plays sounds, runs choice recognition, transfers
//! and hangs up. Backend failures meaning "the call is gone" are folded
//! into [`voicebot_core::Error::CallEnded`] and handled per operation
//! (see [`hangup`]).

pub mod context;
pub mod controller;
pub mod events;
pub mod hangup;
pub mod ivr;

pub use context::{decode_contexts, encode_contexts};
pub use controller::{CallMediaController, MediaState};
pub use events::{CallEvent, CallEventKind, ChoiceResult, ResultInformation};
pub use hangup::{translate, HangupPolicy, MediaOperation};
pub use ivr::IvrLanguageMenu;
