//! State management module
//!
//! This module handles per-conversation sessions, inbound events and the
//! conversation engine that moves sessions between states.

pub mod engine;
pub mod events;
pub mod session;
pub mod storage;

// Re-export commonly used state components
pub use engine::{Action, ConversationEngine, EngineOptions, MenuPlacement, Outcome, Transition};
pub use events::{CallbackTag, DeepLink, Event, Inbound, US_RESIDENT_PAYLOAD};
pub use session::{ConversationState, Session};
pub use storage::{SessionGuard, SessionStore};
