//! Translation loader and i18n management
//!
//! This module provides the core internationalization functionality including
//! translation loading, language fallback and message formatting.

use std::collections::HashMap;
use serde_json::{Value, Map};
use tracing::{warn, debug};
use crate::utils::errors::{IntakeError, Result};
use crate::config::I18nConfig;
use crate::models::Language;

/// Main internationalization manager
#[derive(Debug, Clone)]
pub struct I18n {
    /// Loaded translations by language
    translations: HashMap<Language, Map<String, Value>>,
    /// Fallback language
    default_language: Language,
}

/// Translation parameters for message formatting
pub type TranslationParams = HashMap<String, String>;

fn bundled_translations(lang: Language) -> &'static str {
    match lang {
        Language::Eng => include_str!("../../translations/eng.json"),
        Language::Ita => include_str!("../../translations/ita.json"),
        Language::Spa => include_str!("../../translations/spa.json"),
    }
}

impl I18n {
    /// Create a new I18n instance with the bundled translations loaded
    pub fn new(config: &I18nConfig) -> Result<Self> {
        let mut i18n = Self {
            translations: HashMap::new(),
            default_language: config.default_language,
        };

        for lang in Language::ALL {
            i18n.load_language(lang, bundled_translations(lang))?;
        }

        Ok(i18n)
    }

    /// Parse one language's JSON document
    fn load_language(&mut self, lang: Language, content: &str) -> Result<()> {
        let translations: Value = serde_json::from_str(content)?;

        if let Value::Object(map) = translations {
            debug!("Loaded {} translation groups for {}", map.len(), lang);
            self.translations.insert(lang, map);
        } else {
            return Err(IntakeError::Config(
                format!("Invalid translation file format for {}", lang)
            ));
        }

        Ok(())
    }

    /// Get a translated message
    pub fn t(&self, key: &str, lang: Language, params: Option<&TranslationParams>) -> String {
        let text = self
            .get_translation_value(key, lang)
            .or_else(|| self.get_translation_value(key, self.default_language));

        match text {
            Some(value) => self.format_message(&extract_text_from_value(value), params),
            None => {
                warn!("Translation key '{}' not found in any language", key);
                key.to_string()
            }
        }
    }

    /// Get translation value from nested JSON structure
    fn get_translation_value(&self, key: &str, lang: Language) -> Option<&Value> {
        let translations = self.translations.get(&lang)?;

        // Nested keys like "prompts.ask_photo"
        let mut parts = key.split('.');
        let mut current = translations.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }

        Some(current)
    }

    /// Format message with parameters
    fn format_message(&self, template: &str, params: Option<&TranslationParams>) -> String {
        if let Some(params) = params {
            let mut result = template.to_string();
            for (key, value) in params {
                let placeholder = format!("{{{}}}", key);
                result = result.replace(&placeholder, value);
            }
            result
        } else {
            template.to_string()
        }
    }
}

fn extract_text_from_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}
