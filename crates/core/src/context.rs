//! Operation contexts
//!
//! Attached to call-control operations so asynchronous completion events
//! can be matched back to why the operation was issued.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationContext {
    /// Transfer to a human agent
    ConnectAgent,
    /// Final message before hanging up
    Goodbye,
    /// IVR language selection
    IvrLangSelect,
    /// Transfer to an agent failed
    TransferFailed,
}

impl OperationContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConnectAgent => "connect_agent",
            Self::Goodbye => "goodbye",
            Self::IvrLangSelect => "ivr_lang_select",
            Self::TransferFailed => "transfer_failed",
        }
    }
}

impl std::fmt::Display for OperationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
