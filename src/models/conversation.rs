//! Conversation identity types shared by the engine and the transport

use serde::{Deserialize, Serialize};

/// Stable identifier of one user's conversation (the private chat id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConversationId(pub i64);

/// Reference to a message previously sent into a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef(pub i32);

/// The user behind an inbound event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub user_id: i64,
    /// Telegram handle without the leading `@`
    pub username: Option<String>,
}

impl Sender {
    pub fn new(user_id: i64, username: Option<String>) -> Self {
        Self { user_id, username }
    }

    /// Handle as shown to the operator, if the user has one
    pub fn display_identity(&self) -> Option<String> {
        self.username
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| format!("@{}", name))
    }

    /// Handle as shown to the operator, with a placeholder when missing
    pub fn display_identity_or_placeholder(&self) -> String {
        self.display_identity().unwrap_or_else(|| "Not set".to_string())
    }
}
