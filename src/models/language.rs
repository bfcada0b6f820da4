//! Supported languages and intake flows

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::utils::errors::IntakeError;

/// Languages offered in the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Eng,
    Ita,
    Spa,
}

impl Language {
    /// Picker order
    pub const ALL: [Language; 3] = [Language::Eng, Language::Ita, Language::Spa];

    /// Three-letter code used in callback tags, deep links and translation files
    pub fn code(self) -> &'static str {
        match self {
            Language::Eng => "eng",
            Language::Ita => "ita",
            Language::Spa => "spa",
        }
    }

    /// Flag shown on the picker button and in operator summaries
    pub fn flag(self) -> &'static str {
        match self {
            Language::Eng => "🇬🇧",
            Language::Ita => "🇮🇹",
            Language::Spa => "🇪🇸",
        }
    }

    /// Look up a language by its three-letter code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
            .ok_or_else(|| IntakeError::InvalidInput(format!("Unsupported language: {}", s)))
    }
}

/// Intake path chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Deposit,
    Register,
    UsResident,
}

impl Flow {
    pub fn as_str(self) -> &'static str {
        match self {
            Flow::Deposit => "deposit",
            Flow::Register => "register",
            Flow::UsResident => "us_resident",
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
