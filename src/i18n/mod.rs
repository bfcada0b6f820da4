//! Internationalization module
//!
//! This module handles multi-language support for the KeyRoomBot.
//! It provides translation loading, language fallback and message formatting
//! for the fixed set of picker languages.

pub mod loader;

// Re-export commonly used i18n components
pub use loader::{I18n, TranslationParams};
