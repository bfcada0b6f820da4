//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};
use crate::models::Language;

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub i18n: I18nConfig,
    pub intake: IntakeConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    /// Chat that receives every forwarded record
    pub owner_chat_id: i64,
    /// Public URL Telegram posts updates to; polling is used when unset
    pub webhook_url: Option<String>,
    /// Local address the webhook listener binds to
    pub webhook_listen_addr: String,
}

/// Internationalization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct I18nConfig {
    pub default_language: Language,
}

/// Intake flow configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IntakeConfig {
    /// Ask for the platform username after the photo or email step
    pub require_external_username: bool,
    /// Base URL of the per-language deposit screenshot samples
    pub reference_image_base_url: String,
    /// Directory holding the daily record files
    pub record_log_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("KEYROOM")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::IntakeError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                owner_chat_id: 0,
                webhook_url: None,
                webhook_listen_addr: "0.0.0.0:8443".to_string(),
            },
            i18n: I18nConfig {
                default_language: Language::Eng,
            },
            intake: IntakeConfig {
                require_external_username: true,
                reference_image_base_url: "https://keyroom-images-bucket.s3.eu-central-1.amazonaws.com".to_string(),
                record_log_dir: "records".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
            },
        }
    }
}
