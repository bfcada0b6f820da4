//! Callback query handlers module
//!
//! Every inline button press becomes one engine event. The query is answered
//! first so the client stops showing the loading state.

use teloxide::{prelude::*, types::CallbackQuery};
use tracing::{debug, warn};
use crate::handlers::sender_of;
use crate::models::{ConversationId, MessageRef};
use crate::state::{CallbackTag, ConversationEngine, Event, Inbound};
use crate::utils::errors::Result;

/// Main callback query dispatcher
pub async fn handle_callback_query(bot: Bot, query: CallbackQuery, engine: &ConversationEngine) -> Result<()> {
    let user_id = query.from.id.0 as i64;

    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, callback_id = %query.id, "Failed to answer callback query");
    }

    let Some(data) = query.data.as_deref() else {
        debug!(user_id = user_id, "Callback query without data");
        return Ok(());
    };

    let chat_id = query.message.as_ref().map_or(user_id, |m| m.chat().id.0);
    let message = query.message.as_ref().map(|m| MessageRef(m.id().0));

    debug!(user_id = user_id, chat_id = chat_id, callback_data = %data, "Processing callback query");

    let event = Event::Callback { tag: CallbackTag::parse(data), message };
    let sender = sender_of(Some(&query.from), chat_id);

    engine.handle(Inbound::new(ConversationId(chat_id), sender, event)).await;
    Ok(())
}
