//! Test context for unified test setup
//!
//! Builds a conversation engine wired to recording fakes and offers shortcuts
//! for driving a conversation the way Telegram updates would.

use std::sync::Arc;
use KeyRoomBot::{
    config::I18nConfig,
    i18n::I18n,
    models::{ConversationId, Language, MessageRef, Sender},
    services::{OperatorNotifier, RecordLog, ServiceFactory, Transport},
    state::{CallbackTag, ConversationEngine, EngineOptions, Event, Inbound, Outcome, Session, SessionStore},
};

use super::fakes::{RecordingLog, RecordingNotifier, RecordingTransport};

/// Unified test context that manages all test components
pub struct TestContext {
    pub engine: Arc<ConversationEngine>,
    pub transport: Arc<RecordingTransport>,
    pub notifier: Arc<RecordingNotifier>,
    pub record_log: Arc<RecordingLog>,
    pub i18n: Arc<I18n>,
}

impl TestContext {
    /// Create a new test context with the default options
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    /// Create a new test context with custom options
    pub fn with_options(options: EngineOptions) -> Self {
        let record_log = Arc::new(RecordingLog::default());
        let transport = Arc::new(RecordingTransport::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let i18n = Arc::new(
            I18n::new(&I18nConfig { default_language: options.default_language }).expect("bundled translations load"),
        );
        let services = ServiceFactory::from_parts(
            transport.clone() as Arc<dyn Transport>,
            notifier.clone() as Arc<dyn OperatorNotifier>,
            record_log.clone() as Arc<dyn RecordLog>,
        );
        let engine = Arc::new(ConversationEngine::new(
            Arc::new(SessionStore::new()),
            services,
            i18n.clone(),
            options,
        ));

        Self { engine, transport, notifier, record_log, i18n }
    }

    pub fn t(&self, key: &str, lang: Language) -> String {
        self.i18n.t(key, lang, None)
    }

    pub async fn session(&self, chat: i64) -> Session {
        self.engine.store().get(ConversationId(chat)).await
    }

    pub async fn send(&self, chat: i64, event: Event) -> Outcome {
        self.engine
            .handle(Inbound::new(ConversationId(chat), user(chat), event))
            .await
    }

    pub async fn send_as(&self, chat: i64, sender: Sender, event: Event) -> Outcome {
        self.engine.handle(Inbound::new(ConversationId(chat), sender, event)).await
    }

    pub async fn start(&self, chat: i64, payload: Option<&str>) -> Outcome {
        let event = Event::Start {
            payload: payload.map(str::to_string),
            command_message: Some(MessageRef(1)),
        };
        self.send(chat, event).await
    }

    pub async fn press(&self, chat: i64, tag: &str, message: i32) -> Outcome {
        let event = Event::Callback { tag: CallbackTag::parse(tag), message: Some(MessageRef(message)) };
        self.send(chat, event).await
    }

    pub async fn text(&self, chat: i64, value: &str) -> Outcome {
        self.send(chat, Event::Text { value: value.to_string() }).await
    }

    pub async fn photo(&self, chat: i64, file_id: &str) -> Outcome {
        self.send(chat, Event::Photo { file_id: file_id.to_string() }).await
    }

    /// Message id of the menu currently shown in `chat`
    pub async fn menu(&self, chat: i64) -> i32 {
        self.session(chat)
            .await
            .menu_message_ref
            .map(|m| m.0)
            .expect("a menu is shown")
    }
}

/// Sender with a Telegram handle derived from the chat id
pub fn user(chat: i64) -> Sender {
    Sender::new(chat, Some(format!("user{}", chat)))
}
