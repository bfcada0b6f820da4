//! KeyRoomBot Telegram Bot
//!
//! A Telegram intake bot: it walks each user through a short multilingual
//! conversation (deposit proof, registration contact or US-resident contact)
//! and hands every completed intake to the operator chat and a daily CSV log.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod state;
pub mod i18n;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{IntakeError, Result};

// Re-export main components for easy access
pub use services::ServiceFactory;
pub use state::{ConversationEngine, EngineOptions, SessionStore};
pub use i18n::I18n;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
