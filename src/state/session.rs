//! Conversation session management
//!
//! This module holds the per-conversation fields accumulated while a user
//! walks through the intake flow.

use std::fmt;
use crate::models::{Flow, Language, MessageRef};

/// Where a conversation currently is in the intake flow
///
/// Finishing a flow resets the session to [`ConversationState::Initial`],
/// so the terminal state is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConversationState {
    #[default]
    Initial,
    ChoosingOption,
    WaitingForPhoto,
    WaitingForEmail,
    WaitingForExternalUsername,
}

impl ConversationState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConversationState::Initial => "initial",
            ConversationState::ChoosingOption => "choosing_option",
            ConversationState::WaitingForPhoto => "waiting_for_photo",
            ConversationState::WaitingForEmail => "waiting_for_email",
            ConversationState::WaitingForExternalUsername => "waiting_for_external_username",
        }
    }

    /// True for states that wait on flow-specific input
    pub fn is_waiting(self) -> bool {
        matches!(
            self,
            ConversationState::WaitingForPhoto
                | ConversationState::WaitingForEmail
                | ConversationState::WaitingForExternalUsername
        )
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields collected for one conversation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub state: ConversationState,
    pub language: Option<Language>,
    pub flow: Option<Flow>,
    /// Photo file id held until the record is complete
    pub pending_artifact: Option<String>,
    pub email: Option<String>,
    pub external_username: Option<String>,
    /// Last rendered menu, replaced rather than duplicated
    pub menu_message_ref: Option<MessageRef>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a flow, dropping anything collected for a previous one
    pub fn begin_flow(&mut self, language: Language, flow: Flow, state: ConversationState) {
        self.clear_collected();
        self.language = Some(language);
        self.flow = Some(flow);
        self.state = state;
    }

    /// Drop flow fields and go back to the top-level picker
    ///
    /// The menu reference survives so the next menu can replace it.
    pub fn return_to_menu(&mut self) {
        self.clear_collected();
        self.language = None;
        self.state = ConversationState::ChoosingOption;
    }

    /// Reset after a completed record; nothing is carried over
    pub fn finish(&mut self) {
        *self = Self::default();
    }

    fn clear_collected(&mut self) {
        self.flow = None;
        self.pending_artifact = None;
        self.email = None;
        self.external_username = None;
    }

    /// Check that every field the current flow needs before finalizing is present
    pub fn is_complete(&self, require_external_username: bool) -> bool {
        let Some(flow) = self.flow else {
            return false;
        };
        if self.language.is_none() {
            return false;
        }

        let username_ok = self.external_username.is_some()
            || (!require_external_username && flow != Flow::UsResident);

        match flow {
            Flow::Deposit => self.pending_artifact.is_some() && username_ok,
            Flow::Register => self.email.is_some() && username_ok,
            Flow::UsResident => self.external_username.is_some(),
        }
    }
}
