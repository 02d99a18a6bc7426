//! Persistence errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),
}

impl From<PersistenceError> for voicebot_core::Error {
    fn from(err: PersistenceError) -> Self {
        voicebot_core::Error::Persistence(err.to_string())
    }
}
