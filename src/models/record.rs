//! Intake records handed to the operator and log sinks

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use super::conversation::ConversationId;
use super::language::{Flow, Language};
use crate::utils::helpers::format_timestamp;

/// Header of every daily log file
pub const LOG_HEADER: [&str; 6] = [
    "Date",
    "Display Identity",
    "External Username",
    "Flow",
    "Email",
    "Language",
];

/// A completed, validated intake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub timestamp: DateTime<Utc>,
    pub conversation_id: ConversationId,
    pub display_identity: String,
    pub external_username: Option<String>,
    pub flow: Flow,
    /// Only for [`Flow::Register`]
    pub email: Option<String>,
    /// Photo file id, only for [`Flow::Deposit`]
    pub artifact_ref: Option<String>,
    pub language: Language,
}

impl IntakeRecord {
    /// Day the record is grouped under in the log
    pub fn calendar_date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }

    /// Row values in [`LOG_HEADER`] order
    pub fn log_row(&self) -> [String; 6] {
        [
            format_timestamp(self.timestamp),
            self.display_identity.clone(),
            self.external_username.clone().unwrap_or_default(),
            self.flow.to_string(),
            self.email.clone().unwrap_or_default(),
            self.language.to_string(),
        ]
    }

    /// Human-readable summary for the operator channel
    pub fn operator_summary(&self) -> String {
        let title = match self.flow {
            Flow::Deposit => "New Deposit Proof",
            Flow::Register => "New Contact (Already Registered)",
            Flow::UsResident => "New Contact (US Resident)",
        };

        let mut summary = format!("{}:\nUsername: {}", title, self.display_identity);
        if let Some(external) = &self.external_username {
            summary.push_str(&format!("\nPlatform Username: {}", external));
        }
        if let Some(email) = &self.email {
            summary.push_str(&format!("\nEmail: {}", email));
        }
        summary.push_str(&format!("\nLanguage: {}", self.language.flag()));
        summary
    }
}

/// Unstructured contact forwarded when a deep link is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactNote {
    pub timestamp: DateTime<Utc>,
    pub conversation_id: ConversationId,
    pub user_id: i64,
    pub display_identity: String,
    pub payload: String,
}

impl ContactNote {
    pub fn operator_summary(&self) -> String {
        format!(
            "New Contact:\nUsername: {}\nUser ID: {}\nRegistration Info: {}",
            self.display_identity, self.user_id, self.payload
        )
    }
}
