//! Message history persistence for the voicebot

pub mod error;
pub mod messages;

pub use error::PersistenceError;
pub use messages::{InMemoryMessageStore, MessageStore, MessageTransaction};
