//! Centralized constants for the call-media layer
//!
//! Values here are part of the contract with the speech and telephony
//! backends and are not meant to be tuned per deployment.

/// Speech synthesis resources
pub mod tts {
    /// File name of the pronunciation lexicon under the public resources URL
    pub const LEXICON_FILE: &str = "lexicon.xml";
}

/// Call automation REST API defaults
pub mod call_automation {
    /// API version sent with every request
    pub const API_VERSION: &str = "2023-10-15";

    /// Request timeout (seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Service endpoints (defaults for local development)
pub mod endpoints {
    /// Public resources (sounds, lexicon)
    pub const PUBLIC_RESOURCES_DEFAULT: &str = "http://localhost:8080";
}
