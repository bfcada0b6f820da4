//! Start command handler
//!
//! `/start` opens the top-level menu; `/start <payload>` follows a deep link.

use teloxide::types::Message;
use tracing::debug;
use crate::handlers::sender_of;
use crate::models::{ConversationId, MessageRef};
use crate::state::{ConversationEngine, Event, Inbound};
use crate::utils::errors::Result;

/// Handle /start command - main entry point of every conversation
pub async fn handle_start(msg: Message, payload: String, engine: &ConversationEngine) -> Result<()> {
    let chat_id = msg.chat.id.0;
    let payload = payload.trim();

    debug!(chat_id = chat_id, payload = %payload, "Processing /start command");

    let event = Event::Start {
        payload: (!payload.is_empty()).then(|| payload.to_string()),
        command_message: Some(MessageRef(msg.id.0)),
    };
    let sender = sender_of(msg.from.as_ref(), chat_id);

    engine.handle(Inbound::new(ConversationId(chat_id), sender, event)).await;
    Ok(())
}
