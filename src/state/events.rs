//! Inbound conversation events
//!
//! Transport updates are converted into these tagged events before they reach
//! the engine. Deep-link payloads and callback tags are parsed here so the
//! engine only ever sees typed values.

use std::sync::OnceLock;
use regex::Regex;
use crate::models::{ConversationId, Flow, Language, MessageRef, Sender};

/// Literal deep-link payload for the US-resident path
pub const US_RESIDENT_PAYLOAD: &str = "us_resident";

/// What a `/start` payload asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLink {
    /// `{lang}_deposit` or `{lang}_register`
    Flow { language: Language, flow: Flow },
    /// `us_resident`
    UsResident,
    /// Anything else, forwarded verbatim to the operator
    Contact(String),
}

fn deep_link_regex() -> &'static Regex {
    static DEEP_LINK: OnceLock<Regex> = OnceLock::new();
    DEEP_LINK.get_or_init(|| {
        Regex::new(r"^([a-z]{3})_(deposit|register)$").expect("deep link pattern is valid")
    })
}

impl DeepLink {
    /// Parse a `/start` payload
    pub fn parse(payload: &str) -> Self {
        if payload == US_RESIDENT_PAYLOAD {
            return DeepLink::UsResident;
        }

        let parsed = deep_link_regex().captures(payload).and_then(|caps| {
            let language = Language::from_code(&caps[1])?;
            let flow = match &caps[2] {
                "deposit" => Flow::Deposit,
                _ => Flow::Register,
            };
            Some(DeepLink::Flow { language, flow })
        });

        parsed.unwrap_or_else(|| DeepLink::Contact(payload.to_string()))
    }
}

/// Inline button tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackTag {
    Language(Language),
    DepositProof,
    AlreadyRegistered,
    Us,
    Reset,
    Unknown(String),
}

impl CallbackTag {
    pub fn parse(data: &str) -> Self {
        if let Some(language) = Language::from_code(data) {
            return CallbackTag::Language(language);
        }

        match data {
            "deposit_proof" => CallbackTag::DepositProof,
            "already_registered" => CallbackTag::AlreadyRegistered,
            "us" => CallbackTag::Us,
            "reset" => CallbackTag::Reset,
            other => CallbackTag::Unknown(other.to_string()),
        }
    }

    /// Callback data carried by the button
    pub fn as_str(&self) -> &str {
        match self {
            CallbackTag::Language(language) => language.code(),
            CallbackTag::DepositProof => "deposit_proof",
            CallbackTag::AlreadyRegistered => "already_registered",
            CallbackTag::Us => "us",
            CallbackTag::Reset => "reset",
            CallbackTag::Unknown(other) => other,
        }
    }
}

/// One inbound event of a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `/start` with an optional deep-link payload
    Start {
        payload: Option<String>,
        command_message: Option<MessageRef>,
    },
    /// `/reset`
    Reset,
    /// Inline button press on `message`
    Callback {
        tag: CallbackTag,
        message: Option<MessageRef>,
    },
    /// Message carrying an image; the largest size's file id
    Photo { file_id: String },
    /// Plain text message
    Text { value: String },
    /// Any other message content (stickers, documents, voice, ...)
    OtherContent,
}

impl Event {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Start { .. } => "start",
            Event::Reset => "reset",
            Event::Callback { .. } => "callback",
            Event::Photo { .. } => "photo",
            Event::Text { .. } => "text",
            Event::OtherContent => "other_content",
        }
    }
}

/// An event together with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub conversation_id: ConversationId,
    pub sender: Sender,
    pub event: Event,
}

impl Inbound {
    pub fn new(conversation_id: ConversationId, sender: Sender, event: Event) -> Self {
        Self { conversation_id, sender, event }
    }
}
