//! Configuration management for the voice-bot call-media layer
//!
//! Supports loading configuration from:
//! - YAML files under `config/` (`default.yaml`, then `{env}.yaml`)
//! - Environment variables (`VOICEBOT__` prefix, `__` separator)
//!
//! Settings are read once at startup and handed to components as
//! immutable values.

pub mod constants;
pub mod settings;
pub mod sounds;

pub use settings::{
    load_settings, load_settings_from, CommunicationServicesConfig, ConversationConfig,
    ObservabilityConfig, ResourcesConfig, RuntimeEnvironment, Settings,
};
pub use sounds::Sound;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
