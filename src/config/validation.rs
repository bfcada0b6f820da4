//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use std::net::SocketAddr;
use url::Url;
use crate::utils::errors::{IntakeError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_intake_config(&settings.intake)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(IntakeError::Config(
            "Bot token is required".to_string()
        ));
    }

    if config.owner_chat_id == 0 {
        return Err(IntakeError::Config(
            "Owner chat ID must be configured".to_string()
        ));
    }

    if let Some(ref webhook_url) = config.webhook_url {
        Url::parse(webhook_url)?;

        config.webhook_listen_addr.parse::<SocketAddr>().map_err(|e| {
            IntakeError::Config(format!(
                "Invalid webhook listen address {}: {}", config.webhook_listen_addr, e
            ))
        })?;
    }

    Ok(())
}

/// Validate intake configuration
fn validate_intake_config(config: &super::IntakeConfig) -> Result<()> {
    let base = Url::parse(&config.reference_image_base_url)?;
    if base.cannot_be_a_base() {
        return Err(IntakeError::Config(
            "Reference image base URL must be a base URL".to_string()
        ));
    }

    if config.record_log_dir.is_empty() {
        return Err(IntakeError::Config(
            "Record log directory is required".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(IntakeError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(IntakeError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
