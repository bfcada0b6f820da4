//! Reset command handler

use teloxide::types::Message;
use tracing::debug;
use crate::handlers::sender_of;
use crate::models::ConversationId;
use crate::state::{ConversationEngine, Event, Inbound};
use crate::utils::errors::Result;

/// Handle /reset command - abandon the current flow
pub async fn handle_reset(msg: Message, engine: &ConversationEngine) -> Result<()> {
    let chat_id = msg.chat.id.0;
    debug!(chat_id = chat_id, "Processing /reset command");

    let sender = sender_of(msg.from.as_ref(), chat_id);
    engine.handle(Inbound::new(ConversationId(chat_id), sender, Event::Reset)).await;
    Ok(())
}
