//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod conversation;
pub mod language;
pub mod record;

// Re-export commonly used models
pub use conversation::{ConversationId, MessageRef, Sender};
pub use language::{Flow, Language};
pub use record::{ContactNote, IntakeRecord, LOG_HEADER};
