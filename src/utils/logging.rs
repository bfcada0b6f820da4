//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the KeyRoomBot application.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::models::{ConversationId, IntakeRecord};
use crate::utils::errors::{IntakeError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "keyroombot.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
        .try_init()
        .map_err(|e| IntakeError::Config(format!("Failed to install log subscriber: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a state change of one conversation
pub fn log_transition(conversation_id: ConversationId, event: &str, from: &str, to: &str) {
    debug!(
        conversation_id = conversation_id.0,
        event = event,
        from = from,
        to = to,
        "Conversation transition"
    );
}

/// Log a record handed to the sinks
pub fn log_record_forwarded(record: &IntakeRecord) {
    info!(
        conversation_id = record.conversation_id.0,
        flow = %record.flow,
        language = %record.language,
        display_identity = %record.display_identity,
        "Intake record forwarded"
    );
}

/// Log a transport failure that the conversation recovers from
pub fn log_delivery_failure(conversation_id: ConversationId, action: &str, error: &IntakeError) {
    warn!(
        conversation_id = conversation_id.0,
        action = action,
        error = %error,
        "Delivery failed, continuing"
    );
}

/// Log a sink failure together with the record so it can be recovered by hand
pub fn log_sink_failure(sink: &str, record: &IntakeRecord, error: &IntakeError) {
    let record_json = serde_json::to_string(record).unwrap_or_default();
    error!(
        sink = sink,
        conversation_id = record.conversation_id.0,
        record = %record_json,
        error = %error,
        "Record sink failed"
    );
}
