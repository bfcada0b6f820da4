//! Bot handlers module
//!
//! Thin adapters from Telegram updates to engine events:
//! - Command handlers for `/start` and `/reset`
//! - Callback handlers for inline keyboard interactions
//! - Message handlers for photos, text and everything else

pub mod callbacks;
pub mod commands;
pub mod messages;

// Re-export commonly used handler functions
pub use callbacks::handle_callback_query;
pub use commands::{handle_command, Command};
pub use messages::handle_message;

use teloxide::types::User;
use crate::models::Sender;

/// Identity of whoever sent an update; falls back to the chat when Telegram omits it
pub(crate) fn sender_of(user: Option<&User>, fallback_id: i64) -> Sender {
    match user {
        Some(user) => Sender::new(user.id.0 as i64, user.username.clone()),
        None => Sender::new(fallback_id, None),
    }
}
