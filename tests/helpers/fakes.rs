//! Recording fakes of the transport and the sinks
//!
//! Each fake keeps everything it was asked to do so tests can assert on the
//! exact outbound traffic of a conversation.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;
use async_trait::async_trait;
use KeyRoomBot::{
    models::{ConversationId, IntakeRecord, MessageRef},
    services::{Keyboard, OperatorNotifier, PhotoSource, RecordLog, Transport},
    utils::errors::{IntakeError, Result},
};

/// One outbound transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat: ConversationId,
        text: String,
        tags: Vec<String>,
        message: MessageRef,
    },
    Photo {
        chat: ConversationId,
        photo: PhotoSource,
        caption: String,
    },
    Edit {
        chat: ConversationId,
        message: MessageRef,
        text: String,
        tags: Vec<String>,
    },
    Delete {
        chat: ConversationId,
        message: MessageRef,
    },
}

fn tags_of(keyboard: Option<&Keyboard>) -> Vec<String> {
    keyboard
        .map(|k| k.tags().into_iter().map(str::to_string).collect())
        .unwrap_or_default()
}

#[derive(Debug)]
pub struct RecordingTransport {
    sent: Mutex<Vec<Sent>>,
    next_message: AtomicI32,
    pub fail_edits: AtomicBool,
    pub fail_deletes: AtomicBool,
    pub fail_sends: AtomicBool,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            next_message: AtomicI32::new(100),
            fail_edits: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            fail_sends: AtomicBool::new(false),
        }
    }
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat: ConversationId) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| match s {
                Sent::Text { chat: c, .. }
                | Sent::Photo { chat: c, .. }
                | Sent::Edit { chat: c, .. }
                | Sent::Delete { chat: c, .. } => *c == chat,
            })
            .collect()
    }

    /// Text of the last message sent or edited in `chat`
    pub fn last_text(&self, chat: ConversationId) -> Option<String> {
        self.sent_to(chat).into_iter().rev().find_map(|s| match s {
            Sent::Text { text, .. } | Sent::Edit { text, .. } => Some(text),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    fn record(&self, sent: Sent) {
        self.sent.lock().unwrap().push(sent);
    }

    fn refused(action: &str) -> IntakeError {
        IntakeError::InvalidInput(format!("{} refused by test transport", action))
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(&self, chat: ConversationId, text: &str, keyboard: Option<&Keyboard>) -> Result<MessageRef> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(Self::refused("send_text"));
        }
        let message = MessageRef(self.next_message.fetch_add(1, Ordering::SeqCst));
        self.record(Sent::Text { chat, text: text.to_string(), tags: tags_of(keyboard), message });
        Ok(message)
    }

    async fn send_photo(&self, chat: ConversationId, photo: &PhotoSource, caption: &str) -> Result<MessageRef> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(Self::refused("send_photo"));
        }
        self.record(Sent::Photo { chat, photo: photo.clone(), caption: caption.to_string() });
        Ok(MessageRef(self.next_message.fetch_add(1, Ordering::SeqCst)))
    }

    async fn edit_message(
        &self,
        chat: ConversationId,
        message: MessageRef,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<()> {
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(Self::refused("edit_message"));
        }
        self.record(Sent::Edit { chat, message, text: text.to_string(), tags: tags_of(keyboard) });
        Ok(())
    }

    async fn delete_message(&self, chat: ConversationId, message: MessageRef) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Self::refused("delete_message"));
        }
        self.record(Sent::Delete { chat, message });
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notes: Mutex<Vec<(String, Option<String>)>>,
    pub fail: AtomicBool,
}

impl RecordingNotifier {
    /// Summaries with their image reference, in delivery order
    pub fn notes(&self) -> Vec<(String, Option<String>)> {
        self.notes.lock().unwrap().clone()
    }
}

#[async_trait]
impl OperatorNotifier for RecordingNotifier {
    async fn notify(&self, summary: &str, image_ref: Option<&str>) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(IntakeError::Sink("operator chat unreachable".to_string()));
        }
        self.notes.lock().unwrap().push((summary.to_string(), image_ref.map(str::to_string)));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingLog {
    records: Mutex<Vec<IntakeRecord>>,
    pub fail: AtomicBool,
}

impl RecordingLog {
    pub fn records(&self) -> Vec<IntakeRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordLog for RecordingLog {
    async fn append_record(&self, record: &IntakeRecord) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(IntakeError::Sink("disk full".to_string()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
