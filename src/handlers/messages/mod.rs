//! Message handlers module
//!
//! Handles incoming photos, text and any other message content.

use teloxide::types::{Message, MessageEntityKind};
use tracing::debug;
use crate::handlers::sender_of;
use crate::models::ConversationId;
use crate::state::{ConversationEngine, Event, Inbound};
use crate::utils::errors::Result;

/// Handle incoming non-command messages
pub async fn handle_message(msg: Message, engine: &ConversationEngine) -> Result<()> {
    let chat_id = msg.chat.id.0;
    let event = event_of(&msg);

    debug!(chat_id = chat_id, kind = event.kind(), "Processing message");

    let sender = sender_of(msg.from.as_ref(), chat_id);
    engine.handle(Inbound::new(ConversationId(chat_id), sender, event)).await;
    Ok(())
}

/// Classify a message; photos carry the file id of their largest size
///
/// Commands the bot does not know never count as text input.
pub fn event_of(msg: &Message) -> Event {
    if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
        return Event::Photo { file_id: photo.file.id.to_string() };
    }

    match msg.text() {
        Some(_) if is_command(msg) => Event::OtherContent,
        Some(text) => Event::Text { value: text.to_string() },
        None => Event::OtherContent,
    }
}

fn is_command(msg: &Message) -> bool {
    let leading_entity = msg
        .entities()
        .and_then(|entities| entities.first())
        .is_some_and(|entity| entity.offset == 0 && entity.kind == MessageEntityKind::BotCommand);

    leading_entity || msg.text().is_some_and(|text| text.trim_start().starts_with('/'))
}
