//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use voicebot_core::CallLanguage;

use crate::constants::{call_automation, endpoints, tts};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Public resources (sounds, lexicon)
    #[serde(default)]
    pub resources: ResourcesConfig,

    /// Call automation backend
    #[serde(default)]
    pub communication_services: CommunicationServicesConfig,

    /// Languages and speech defaults
    #[serde(default)]
    pub conversation: ConversationConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Public resources served over HTTP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// Base URL the telephony backend fetches sounds and the lexicon from
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

fn default_public_url() -> String {
    endpoints::PUBLIC_RESOURCES_DEFAULT.to_string()
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            public_url: default_public_url(),
        }
    }
}

impl ResourcesConfig {
    /// Resolve a file name against the public URL
    pub fn resolve(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_url.trim_end_matches('/'), file_name)
    }

    /// URL of the pronunciation lexicon referenced by every SSML document
    pub fn lexicon_url(&self) -> String {
        self.resolve(tts::LEXICON_FILE)
    }
}

/// Call automation backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunicationServicesConfig {
    /// Resource endpoint, e.g. `https://my-acs.communication.azure.com`
    #[serde(default)]
    pub endpoint: String,

    /// Base64 access key used to sign requests
    #[serde(default)]
    pub access_key: Option<String>,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Number the bot calls from, in E.164
    #[serde(default)]
    pub phone_number: String,
}

fn default_api_version() -> String {
    call_automation::API_VERSION.to_string()
}

fn default_request_timeout_secs() -> u64 {
    call_automation::REQUEST_TIMEOUT_SECS
}

impl Default for CommunicationServicesConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_key: None,
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout_secs(),
            phone_number: String::new(),
        }
    }
}

/// Conversation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Short code of the language calls start in
    #[serde(default = "default_lang")]
    pub default_lang: String,

    /// Languages a caller can pick from
    #[serde(default = "default_languages")]
    pub languages: Vec<CallLanguage>,

    /// Speaking rate applied to new calls
    #[serde(default = "default_prosody_rate")]
    pub prosody_rate: f32,
}

fn default_lang() -> String {
    "fr-FR".to_string()
}

fn default_languages() -> Vec<CallLanguage> {
    vec![
        CallLanguage::default(),
        CallLanguage::new("en-US", "en-US-AvaMultilingualNeural")
            .with_display_name("English (United States)")
            .with_pronunciations(vec![
                "English".to_string(),
                "EN".to_string(),
                "United States".to_string(),
            ]),
        CallLanguage::new("es-ES", "es-ES-ElviraNeural")
            .with_display_name("Spanish (Spain)")
            .with_pronunciations(vec!["Spanish".to_string(), "ES".to_string(), "Spain".to_string()]),
    ]
}

fn default_prosody_rate() -> f32 {
    1.0
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            default_lang: default_lang(),
            languages: default_languages(),
            prosody_rate: default_prosody_rate(),
        }
    }
}

impl ConversationConfig {
    /// Find a configured language by short code
    pub fn language(&self, short_code: &str) -> Option<&CallLanguage> {
        self.languages
            .iter()
            .find(|lang| lang.short_code.eq_ignore_ascii_case(short_code))
    }

    /// Language new calls start in
    pub fn default_language(&self) -> CallLanguage {
        self.language(&self.default_lang)
            .or_else(|| self.languages.first())
            .cloned()
            .unwrap_or_default()
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_resources()?;
        self.validate_communication_services()?;
        self.validate_conversation()?;
        Ok(())
    }

    fn validate_resources(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.resources.public_url).map_err(|e| ConfigError::InvalidValue {
            field: "resources.public_url".to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    fn validate_communication_services(&self) -> Result<(), ConfigError> {
        let acs = &self.communication_services;

        if acs.endpoint.is_empty() {
            if self.environment.is_strict() {
                return Err(ConfigError::MissingField(
                    "communication_services.endpoint".to_string(),
                ));
            }
            tracing::warn!("communication_services.endpoint not configured (required for production)");
        } else if let Err(e) = url::Url::parse(&acs.endpoint) {
            return Err(ConfigError::InvalidValue {
                field: "communication_services.endpoint".to_string(),
                message: e.to_string(),
            });
        }

        if self.environment.is_production() && acs.access_key.is_none() {
            return Err(ConfigError::InvalidValue {
                field: "communication_services.access_key".to_string(),
                message: "Access key must be set in production".to_string(),
            });
        }

        if acs.api_version.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "communication_services.api_version".to_string(),
                message: "Cannot be empty".to_string(),
            });
        }

        if acs.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "communication_services.request_timeout_secs".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    fn validate_conversation(&self) -> Result<(), ConfigError> {
        let conversation = &self.conversation;

        if conversation.languages.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "conversation.languages".to_string(),
                message: "At least one language is required".to_string(),
            });
        }

        if conversation.language(&conversation.default_lang).is_none() {
            return Err(ConfigError::InvalidValue {
                field: "conversation.default_lang".to_string(),
                message: format!(
                    "'{}' is not one of the configured languages",
                    conversation.default_lang
                ),
            });
        }

        if !(0.5..=2.0).contains(&conversation.prosody_rate) {
            return Err(ConfigError::InvalidValue {
                field: "conversation.prosody_rate".to_string(),
                message: format!(
                    "Must be between 0.5 and 2.0, got {}",
                    conversation.prosody_rate
                ),
            });
        }

        Ok(())
    }
}

/// Load settings from `config/`, then environment variables
///
/// Priority: `VOICEBOT__*` env vars > `config/{env}.yaml` > `config/default.yaml` > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from a specific configuration directory
pub fn load_settings_from(config_dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::from(config_dir.join("default")).required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::from(config_dir.join(env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("VOICEBOT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
