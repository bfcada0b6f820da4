//! Command handlers module
//!
//! This module contains handlers for the bot commands `/start` and `/reset`.

pub mod reset;
pub mod start;

use std::sync::Arc;
use teloxide::{types::Message, utils::command::BotCommands};
use crate::utils::errors::Result;
use crate::state::ConversationEngine;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "KeyRoom commands:")]
pub enum Command {
    #[command(description = "Open the menu or follow a deep link")]
    Start(String),
    #[command(description = "Go back to the menu")]
    Reset,
}

/// Main command dispatcher
pub async fn handle_command(msg: Message, cmd: Command, engine: Arc<ConversationEngine>) -> Result<()> {
    match cmd {
        Command::Start(payload) => start::handle_start(msg, payload, &engine).await,
        Command::Reset => reset::handle_reset(msg, &engine).await,
    }
}
