//! Operator notification service
//!
//! Forwards finished intakes and contact notes to the single operator chat,
//! attaching the deposit photo when there is one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};
use crate::models::ConversationId;
use crate::utils::errors::Result;
use super::transport::{PhotoSource, Transport};

/// Sink for human-readable summaries
#[async_trait]
pub trait OperatorNotifier: Send + Sync {
    /// Deliver a summary, with the referenced photo when given
    async fn notify(&self, summary: &str, image_ref: Option<&str>) -> Result<()>;
}

/// Notification statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationStats {
    pub total_sent: u64,
    pub total_failed: u64,
}

/// Notification service sending to the operator chat through the transport
pub struct NotificationService {
    transport: Arc<dyn Transport>,
    owner_chat: ConversationId,
    sent: AtomicU64,
    failed: AtomicU64,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(transport: Arc<dyn Transport>, owner_chat: ConversationId) -> Self {
        Self {
            transport,
            owner_chat,
            sent: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Get notification statistics
    pub fn get_stats(&self) -> NotificationStats {
        NotificationStats {
            total_sent: self.sent.load(Ordering::Relaxed),
            total_failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("owner_chat", &self.owner_chat)
            .field("stats", &self.get_stats())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl OperatorNotifier for NotificationService {
    async fn notify(&self, summary: &str, image_ref: Option<&str>) -> Result<()> {
        let result = match image_ref {
            Some(file_id) => {
                let photo = PhotoSource::FileId(file_id.to_string());
                self.transport.send_photo(self.owner_chat, &photo, summary).await
            }
            None => self.transport.send_text(self.owner_chat, summary, None).await,
        };

        match result {
            Ok(_) => {
                self.sent.fetch_add(1, Ordering::Relaxed);
                debug!(owner_chat = self.owner_chat.0, with_photo = image_ref.is_some(), "Operator notified");
                Ok(())
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                warn!(owner_chat = self.owner_chat.0, error = %e, "Failed to notify operator");
                Err(e)
            }
        }
    }
}
