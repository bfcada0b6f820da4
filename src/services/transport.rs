//! Messaging transport
//!
//! The engine talks to Telegram only through the [`Transport`] trait so the
//! conversation logic can be exercised without a bot token.

use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId},
};
use tracing::debug;
use url::Url;
use crate::models::{ConversationId, MessageRef};
use crate::utils::errors::Result;

/// Inline button: label shown to the user and the callback tag it sends back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub tag: String,
}

impl Button {
    pub fn new(label: impl Into<String>, tag: impl Into<String>) -> Self {
        Self { label: label.into(), tag: tag.into() }
    }
}

/// Rows of inline buttons
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new(rows: Vec<Vec<Button>>) -> Self {
        Self { rows }
    }

    /// Callback tags of every button, row by row
    pub fn tags(&self) -> Vec<&str> {
        self.rows.iter().flatten().map(|button| button.tag.as_str()).collect()
    }
}

impl From<&Keyboard> for InlineKeyboardMarkup {
    fn from(keyboard: &Keyboard) -> Self {
        InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
            row.iter()
                .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.tag.clone()))
                .collect::<Vec<_>>()
        }))
    }
}

/// Where a photo comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoSource {
    /// Public URL Telegram fetches itself
    Url(String),
    /// File already stored on Telegram's side
    FileId(String),
}

/// Outbound operations the engine needs from the messaging platform
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send text, optionally with inline buttons
    async fn send_text(
        &self,
        chat: ConversationId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef>;

    /// Send an image with a caption
    async fn send_photo(
        &self,
        chat: ConversationId,
        photo: &PhotoSource,
        caption: &str,
    ) -> Result<MessageRef>;

    /// Replace the text and buttons of an earlier message
    async fn edit_message(
        &self,
        chat: ConversationId,
        message: MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()>;

    /// Delete an earlier message
    async fn delete_message(&self, chat: ConversationId, message: MessageRef) -> Result<()>;
}

/// Telegram Bot API transport
#[derive(Debug, Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(
        &self,
        chat: ConversationId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<MessageRef> {
        let mut request = self.bot.send_message(ChatId(chat.0), text);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(InlineKeyboardMarkup::from(keyboard));
        }

        let message = request.await?;
        debug!(chat_id = chat.0, message_id = message.id.0, "Text sent");
        Ok(MessageRef(message.id.0))
    }

    async fn send_photo(
        &self,
        chat: ConversationId,
        photo: &PhotoSource,
        caption: &str,
    ) -> Result<MessageRef> {
        let file = match photo {
            PhotoSource::Url(url) => InputFile::url(Url::parse(url)?),
            PhotoSource::FileId(id) => InputFile::file_id(id.clone()),
        };

        let message = self.bot.send_photo(ChatId(chat.0), file).caption(caption).await?;
        debug!(chat_id = chat.0, message_id = message.id.0, "Photo sent");
        Ok(MessageRef(message.id.0))
    }

    async fn edit_message(
        &self,
        chat: ConversationId,
        message: MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        let mut request = self.bot.edit_message_text(ChatId(chat.0), MessageId(message.0), text);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(InlineKeyboardMarkup::from(keyboard));
        }

        request.await?;
        Ok(())
    }

    async fn delete_message(&self, chat: ConversationId, message: MessageRef) -> Result<()> {
        self.bot.delete_message(ChatId(chat.0), MessageId(message.0)).await?;
        Ok(())
    }
}
