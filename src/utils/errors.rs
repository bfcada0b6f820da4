//! Error handling for KeyRoomBot
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for KeyRoomBot application
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Sink error: {0}")]
    Sink(String),
}

/// Result type alias for KeyRoomBot operations
pub type Result<T> = std::result::Result<T, IntakeError>;

impl IntakeError {
    /// Check if the error only affects the current delivery attempt
    pub fn is_recoverable(&self) -> bool {
        match self {
            IntakeError::Telegram(_) => true,
            IntakeError::Config(_) => false,
            IntakeError::ConfigLoad(_) => false,
            IntakeError::Serialization(_) => false,
            IntakeError::Io(_) => true,
            IntakeError::UrlParse(_) => false,
            IntakeError::InvalidInput(_) => true,
            IntakeError::Sink(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            IntakeError::Config(_) => ErrorSeverity::Critical,
            IntakeError::ConfigLoad(_) => ErrorSeverity::Critical,
            IntakeError::Telegram(_) => ErrorSeverity::Warning,
            IntakeError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
