//! Services module
//!
//! This module contains the collaborators the conversation engine calls:
//! the messaging transport, the operator notifier and the record log.

pub mod notification;
pub mod record_log;
pub mod transport;

// Re-export commonly used services
pub use notification::{NotificationService, NotificationStats, OperatorNotifier};
pub use record_log::{CsvRecordLog, RecordLog};
pub use transport::{Button, Keyboard, PhotoSource, TelegramTransport, Transport};

use std::sync::Arc;
use teloxide::Bot;
use crate::config::settings::Settings;
use crate::models::ConversationId;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub transport: Arc<dyn Transport>,
    pub notifier: Arc<dyn OperatorNotifier>,
    pub record_log: Arc<dyn RecordLog>,
}

impl ServiceFactory {
    /// Create a new ServiceFactory backed by the Telegram bot
    pub fn new(bot: Bot, settings: &Settings) -> Self {
        let transport: Arc<dyn Transport> = Arc::new(TelegramTransport::new(bot));
        let notifier = Arc::new(NotificationService::new(
            Arc::clone(&transport),
            ConversationId(settings.bot.owner_chat_id),
        ));
        let record_log = Arc::new(CsvRecordLog::new(&settings.intake.record_log_dir));

        Self {
            transport,
            notifier,
            record_log,
        }
    }

    /// Assemble a factory from existing collaborators
    pub fn from_parts(
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn OperatorNotifier>,
        record_log: Arc<dyn RecordLog>,
    ) -> Self {
        Self {
            transport,
            notifier,
            record_log,
        }
    }
}

impl std::fmt::Debug for ServiceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceFactory").finish_non_exhaustive()
    }
}
