//! Conversation engine
//!
//! [`ConversationEngine::transition`] is the transition table: it maps the
//! current session and one inbound event to the next session and a list of
//! outbound [`Action`]s without touching the network. [`ConversationEngine::handle`]
//! runs a transition under the conversation's lock, performs the actions
//! through the transport and sinks, and stores the result.

use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use crate::config::Settings;
use crate::i18n::I18n;
use crate::models::{ContactNote, ConversationId, Flow, IntakeRecord, Language, MessageRef};
use crate::services::{Button, Keyboard, PhotoSource, ServiceFactory};
use crate::utils::helpers::is_valid_email;
use crate::utils::logging::{log_delivery_failure, log_record_forwarded, log_sink_failure, log_transition};
use super::events::{CallbackTag, DeepLink, Event, Inbound};
use super::session::{ConversationState, Session};
use super::storage::SessionStore;

/// Deployment options of the intake flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Ask for the platform username after the photo or email step
    pub require_external_username: bool,
    /// Base URL of `{lang}_pc.png` and `{lang}_mobile.png`
    pub reference_image_base_url: String,
    /// Language used before the user picks one
    pub default_language: Language,
}

impl EngineOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            require_external_username: settings.intake.require_external_username,
            reference_image_base_url: settings.intake.reference_image_base_url.clone(),
            default_language: settings.i18n.default_language,
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// How a menu reaches the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuPlacement {
    /// Rewrite the message whose button was pressed
    InPlace(MessageRef),
    /// Delete the previous menu, if any, and send a new one
    Fresh,
}

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SendText {
        text: String,
        keyboard: Option<Keyboard>,
    },
    SendPhoto {
        photo: PhotoSource,
        caption: String,
    },
    /// Render a menu and remember it as the conversation's menu message
    ShowMenu {
        text: String,
        keyboard: Keyboard,
        placement: MenuPlacement,
    },
    EditMessage {
        message: MessageRef,
        text: String,
        keyboard: Option<Keyboard>,
    },
    DeleteMessage(MessageRef),
    /// Hand an unrecognized deep link to the operator
    ForwardContact(ContactNote),
    /// Hand a completed record to the operator and the log
    Finalize(IntakeRecord),
}

/// Result of applying one event to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub session: Session,
    pub actions: Vec<Action>,
}

impl Transition {
    fn new(session: Session) -> Self {
        Self { session, actions: Vec::new() }
    }

    fn push(&mut self, action: Action) -> &mut Self {
        self.actions.push(action);
        self
    }
}

/// What happened while handling one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub from: ConversationState,
    pub to: ConversationState,
    /// Transport calls that failed and were skipped
    pub delivery_failures: u32,
    /// Sink calls that failed; the record is in the error log
    pub sink_failures: u32,
}

/// The intake state machine
pub struct ConversationEngine {
    store: Arc<SessionStore>,
    services: ServiceFactory,
    i18n: Arc<I18n>,
    options: EngineOptions,
}

impl std::fmt::Debug for ConversationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationEngine")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ConversationEngine {
    pub fn new(
        store: Arc<SessionStore>,
        services: ServiceFactory,
        i18n: Arc<I18n>,
        options: EngineOptions,
    ) -> Self {
        Self { store, services, i18n, options }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Apply one inbound event: transition, side effects, persist
    pub async fn handle(&self, inbound: Inbound) -> Outcome {
        let conversation_id = inbound.conversation_id;
        let mut guard = self.store.acquire(conversation_id).await;

        let from = guard.state;
        let Transition { mut session, actions } = self.transition(&guard, &inbound, Utc::now());

        let mut outcome = Outcome {
            from,
            to: session.state,
            delivery_failures: 0,
            sink_failures: 0,
        };

        for action in actions {
            self.execute(conversation_id, action, &mut session, &mut outcome).await;
        }

        log_transition(conversation_id, inbound.event.kind(), from.as_str(), session.state.as_str());
        *guard = session;
        drop(guard);

        self.store.evict_idle(conversation_id).await;
        outcome
    }

    /// Compute the next session and the actions for one event
    pub fn transition(&self, session: &Session, inbound: &Inbound, now: DateTime<Utc>) -> Transition {
        use ConversationState::*;

        match (&inbound.event, session.state) {
            (Event::Start { payload, command_message }, _) => {
                self.on_start(session, inbound, payload.as_deref(), *command_message, now)
            }
            (Event::Reset, _) => self.back_to_menu(session, MenuPlacement::Fresh),
            (Event::Callback { tag, message }, Initial | ChoosingOption) => {
                self.on_menu_choice(session, tag, *message)
            }
            (Event::Callback { tag: CallbackTag::Reset, message }, _) => {
                self.back_to_menu(session, placement_for(*message))
            }
            (Event::Callback { tag, .. }, state) => {
                debug!(tag = tag.as_str(), state = %state, "Ignoring stale button");
                Transition::new(session.clone())
            }
            (Event::Photo { file_id }, WaitingForPhoto) => {
                let mut next = session.clone();
                next.pending_artifact = Some(file_id.clone());
                self.after_flow_input(next, inbound, now)
            }
            (_, WaitingForPhoto) => {
                let lang = self.language_of(session);
                let mut params = HashMap::new();
                params.insert("reset_button".to_string(), self.i18n.t("menu.reset_button", lang, None));
                let text = self.i18n.t("errors.invalid_photo_reset", lang, Some(&params));
                self.reprompt(session, text)
            }
            (Event::Text { value }, WaitingForEmail) => {
                let email = value.trim();
                if !is_valid_email(email) {
                    let text = self.i18n.t("errors.invalid_email", self.language_of(session), None);
                    return self.reprompt(session, text);
                }
                let mut next = session.clone();
                next.email = Some(email.to_string());
                self.after_flow_input(next, inbound, now)
            }
            (_, WaitingForEmail) => {
                let text = self.i18n.t("errors.invalid_email", self.language_of(session), None);
                self.reprompt(session, text)
            }
            (Event::Text { value }, WaitingForExternalUsername) => {
                self.on_external_username(session, inbound, value.trim(), now)
            }
            (_, WaitingForExternalUsername) => {
                let text = self.i18n.t("errors.invalid_username", self.language_of(session), None);
                self.reprompt(session, text)
            }
            (_, Initial | ChoosingOption) => {
                let mut transition = Transition::new(session.clone());
                transition.push(Action::SendText {
                    text: self.i18n.t("messages.use_start", self.language_of(session), None),
                    keyboard: None,
                });
                transition
            }
        }
    }

    fn on_start(
        &self,
        session: &Session,
        inbound: &Inbound,
        payload: Option<&str>,
        command_message: Option<MessageRef>,
        now: DateTime<Utc>,
    ) -> Transition {
        let Some(payload) = payload.filter(|p| !p.is_empty()) else {
            let mut transition = self.back_to_menu(session, MenuPlacement::Fresh);
            if let Some(message) = command_message {
                transition.actions.insert(0, Action::DeleteMessage(message));
            }
            return transition;
        };

        let mut next = session.clone();
        match DeepLink::parse(payload) {
            DeepLink::Flow { language, flow: Flow::Deposit } => {
                next.begin_flow(language, Flow::Deposit, ConversationState::WaitingForPhoto);
                let mut transition = Transition::new(next);
                self.push_photo_prompt(&mut transition, language);
                transition
            }
            DeepLink::Flow { language, flow } => {
                next.begin_flow(language, flow, ConversationState::WaitingForEmail);
                let mut transition = Transition::new(next);
                transition.push(Action::SendText {
                    text: self.i18n.t("prompts.ask_email", language, None),
                    keyboard: None,
                });
                transition
            }
            DeepLink::UsResident => {
                let language = self.options.default_language;
                next.begin_flow(language, Flow::UsResident, ConversationState::WaitingForExternalUsername);
                let mut transition = Transition::new(next);
                transition.push(Action::SendText {
                    text: self.i18n.t("prompts.ask_username", language, None),
                    keyboard: None,
                });
                transition
            }
            DeepLink::Contact(payload) => {
                let note = ContactNote {
                    timestamp: now,
                    conversation_id: inbound.conversation_id,
                    user_id: inbound.sender.user_id,
                    display_identity: inbound.sender.display_identity_or_placeholder(),
                    payload,
                };
                next.finish();
                let mut transition = Transition::new(next);
                transition
                    .push(Action::ForwardContact(note))
                    .push(Action::SendText {
                        text: self.i18n.t("messages.contact_forwarded", self.options.default_language, None),
                        keyboard: None,
                    });
                transition
            }
        }
    }

    fn on_menu_choice(&self, session: &Session, tag: &CallbackTag, message: Option<MessageRef>) -> Transition {
        let mut next = session.clone();

        match (tag, session.language) {
            (CallbackTag::Language(language), _) => {
                next.return_to_menu();
                next.language = Some(*language);
                let mut transition = Transition::new(next);
                transition.push(Action::ShowMenu {
                    text: self.i18n.t("menu.choose_option", *language, None),
                    keyboard: self.intent_picker(*language),
                    placement: placement_for(message),
                });
                transition
            }
            (CallbackTag::DepositProof, Some(language)) => {
                next.begin_flow(language, Flow::Deposit, ConversationState::WaitingForPhoto);
                if let Some(message) = message {
                    if next.menu_message_ref == Some(message) {
                        next.menu_message_ref = None;
                    }
                }
                let mut transition = Transition::new(next);
                if let Some(message) = message {
                    transition.push(Action::DeleteMessage(message));
                }
                self.push_photo_prompt(&mut transition, language);
                transition
            }
            (CallbackTag::AlreadyRegistered, Some(language)) => {
                next.begin_flow(language, Flow::Register, ConversationState::WaitingForEmail);
                let text = self.i18n.t("prompts.ask_email", language, None);
                self.prompt_on(next, message, text)
            }
            (CallbackTag::Us, language) => {
                let language = language.unwrap_or(self.options.default_language);
                next.begin_flow(language, Flow::UsResident, ConversationState::WaitingForExternalUsername);
                let text = self.i18n.t("prompts.ask_username", language, None);
                self.prompt_on(next, message, text)
            }
            (tag, _) => {
                debug!(tag = tag.as_str(), "Falling back to the top-level menu");
                self.back_to_menu(session, placement_for(message))
            }
        }
    }

    fn on_external_username(
        &self,
        session: &Session,
        inbound: &Inbound,
        username: &str,
        now: DateTime<Utc>,
    ) -> Transition {
        let lang = self.language_of(session);

        if username.is_empty() {
            return self.reprompt(session, self.i18n.t("errors.invalid_username", lang, None));
        }
        if inbound.sender.display_identity().is_none() {
            return self.reprompt(session, self.i18n.t("errors.handle_required", lang, None));
        }

        let mut next = session.clone();
        next.external_username = Some(username.to_string());
        self.finalize(next, inbound, now)
    }

    /// Continue after a photo or email was accepted
    fn after_flow_input(&self, mut next: Session, inbound: &Inbound, now: DateTime<Utc>) -> Transition {
        if !self.options.require_external_username {
            return self.finalize(next, inbound, now);
        }

        next.state = ConversationState::WaitingForExternalUsername;
        let text = self.i18n.t("prompts.ask_username", self.language_of(&next), None);
        let mut transition = Transition::new(next);
        transition.push(Action::SendText { text, keyboard: None });
        transition
    }

    /// Build the record, hand it over and clear the session
    fn finalize(&self, mut next: Session, inbound: &Inbound, now: DateTime<Utc>) -> Transition {
        let (Some(flow), Some(language)) = (next.flow, next.language) else {
            warn!(conversation_id = inbound.conversation_id.0, "Flow input without a flow, returning to menu");
            return self.back_to_menu(&next, MenuPlacement::Fresh);
        };
        if !next.is_complete(self.options.require_external_username) {
            warn!(conversation_id = inbound.conversation_id.0, flow = %flow, "Incomplete record, returning to menu");
            return self.back_to_menu(&next, MenuPlacement::Fresh);
        }

        let record = IntakeRecord {
            timestamp: now,
            conversation_id: inbound.conversation_id,
            display_identity: inbound.sender.display_identity_or_placeholder(),
            external_username: next.external_username.take(),
            flow,
            email: if flow == Flow::Register { next.email.take() } else { None },
            artifact_ref: if flow == Flow::Deposit { next.pending_artifact.take() } else { None },
            language,
        };

        next.finish();
        let mut transition = Transition::new(next);
        transition
            .push(Action::Finalize(record))
            .push(Action::SendText {
                text: self.i18n.t("messages.success", language, None),
                keyboard: None,
            });
        transition
    }

    fn back_to_menu(&self, session: &Session, placement: MenuPlacement) -> Transition {
        let mut next = session.clone();
        next.return_to_menu();
        let mut transition = Transition::new(next);
        transition.push(Action::ShowMenu {
            text: self.i18n.t("menu.choose_option", self.options.default_language, None),
            keyboard: self.top_level_picker(),
            placement,
        });
        transition
    }

    /// Same state, a hint and a way back to the menu
    fn reprompt(&self, session: &Session, text: String) -> Transition {
        let mut transition = Transition::new(session.clone());
        transition.push(Action::SendText {
            text,
            keyboard: Some(self.reset_keyboard(self.language_of(session))),
        });
        transition
    }

    /// Turn the pressed menu into a prompt, or send the prompt when there is no menu
    fn prompt_on(&self, next: Session, message: Option<MessageRef>, text: String) -> Transition {
        let mut transition = Transition::new(next);
        match message {
            Some(message) => transition.push(Action::EditMessage { message, text, keyboard: None }),
            None => transition.push(Action::SendText { text, keyboard: None }),
        };
        transition
    }

    fn push_photo_prompt(&self, transition: &mut Transition, language: Language) {
        for (suffix, caption_key) in [("pc", "prompts.pc_sample_caption"), ("mobile", "prompts.mobile_sample_caption")] {
            transition.push(Action::SendPhoto {
                photo: PhotoSource::Url(self.reference_image_url(language, suffix)),
                caption: self.i18n.t(caption_key, language, None),
            });
        }
        transition.push(Action::SendText {
            text: self.i18n.t("prompts.ask_photo", language, None),
            keyboard: None,
        });
    }

    /// Sample screenshot for a language, e.g. `{base}/ita_mobile.png`
    pub fn reference_image_url(&self, language: Language, suffix: &str) -> String {
        format!(
            "{}/{}_{}.png",
            self.options.reference_image_base_url.trim_end_matches('/'),
            language.code(),
            suffix
        )
    }

    fn language_of(&self, session: &Session) -> Language {
        session.language.unwrap_or(self.options.default_language)
    }

    /// Language flags plus the US-resident shortcut
    pub fn top_level_picker(&self) -> Keyboard {
        let lang = self.options.default_language;
        Keyboard::new(vec![
            Language::ALL
                .into_iter()
                .map(|language| Button::new(language.flag(), CallbackTag::Language(language).as_str()))
                .collect(),
            vec![Button::new(self.i18n.t("menu.us_residents_button", lang, None), CallbackTag::Us.as_str())],
        ])
    }

    /// Intent choices once a language is picked
    pub fn intent_picker(&self, lang: Language) -> Keyboard {
        Keyboard::new(vec![
            vec![
                Button::new(self.i18n.t("menu.deposit_proof_button", lang, None), CallbackTag::DepositProof.as_str()),
                Button::new(
                    self.i18n.t("menu.already_registered_button", lang, None),
                    CallbackTag::AlreadyRegistered.as_str(),
                ),
            ],
            vec![Button::new(self.i18n.t("menu.us_resident_button", lang, None), CallbackTag::Us.as_str())],
            vec![Button::new(self.i18n.t("menu.reset_button", lang, None), CallbackTag::Reset.as_str())],
        ])
    }

    fn reset_keyboard(&self, lang: Language) -> Keyboard {
        Keyboard::new(vec![vec![Button::new(
            self.i18n.t("menu.reset_button", lang, None),
            CallbackTag::Reset.as_str(),
        )]])
    }

    async fn execute(
        &self,
        conversation_id: ConversationId,
        action: Action,
        session: &mut Session,
        outcome: &mut Outcome,
    ) {
        let transport = &self.services.transport;

        match action {
            Action::SendText { text, keyboard } => {
                if let Err(e) = transport.send_text(conversation_id, &text, keyboard.as_ref()).await {
                    log_delivery_failure(conversation_id, "send_text", &e);
                    outcome.delivery_failures += 1;
                }
            }
            Action::SendPhoto { photo, caption } => {
                if let Err(e) = transport.send_photo(conversation_id, &photo, &caption).await {
                    log_delivery_failure(conversation_id, "send_photo", &e);
                    outcome.delivery_failures += 1;
                }
            }
            Action::ShowMenu { text, keyboard, placement } => {
                if let MenuPlacement::InPlace(message) = placement {
                    match transport.edit_message(conversation_id, message, &text, Some(&keyboard)).await {
                        Ok(()) => {
                            session.menu_message_ref = Some(message);
                            return;
                        }
                        Err(e) => {
                            log_delivery_failure(conversation_id, "edit_menu", &e);
                            outcome.delivery_failures += 1;
                        }
                    }
                }

                if let Some(previous) = session.menu_message_ref.take() {
                    if let Err(e) = transport.delete_message(conversation_id, previous).await {
                        log_delivery_failure(conversation_id, "delete_menu", &e);
                        outcome.delivery_failures += 1;
                    }
                }

                match transport.send_text(conversation_id, &text, Some(&keyboard)).await {
                    Ok(message) => session.menu_message_ref = Some(message),
                    Err(e) => {
                        log_delivery_failure(conversation_id, "send_menu", &e);
                        outcome.delivery_failures += 1;
                    }
                }
            }
            Action::EditMessage { message, text, keyboard } => {
                let Err(e) = transport.edit_message(conversation_id, message, &text, keyboard.as_ref()).await else {
                    return;
                };
                log_delivery_failure(conversation_id, "edit_message", &e);
                outcome.delivery_failures += 1;

                // The prompt still has to reach the user
                if let Err(e) = transport.send_text(conversation_id, &text, keyboard.as_ref()).await {
                    log_delivery_failure(conversation_id, "send_text", &e);
                    outcome.delivery_failures += 1;
                }
            }
            Action::DeleteMessage(message) => {
                if let Err(e) = transport.delete_message(conversation_id, message).await {
                    log_delivery_failure(conversation_id, "delete_message", &e);
                    outcome.delivery_failures += 1;
                }
            }
            Action::ForwardContact(note) => {
                if let Err(e) = self.services.notifier.notify(&note.operator_summary(), None).await {
                    tracing::error!(
                        conversation_id = conversation_id.0,
                        payload = %note.payload,
                        error = %e,
                        "Failed to forward contact note"
                    );
                    outcome.sink_failures += 1;
                }
            }
            Action::Finalize(record) => {
                let summary = record.operator_summary();
                let (notified, appended) = futures::join!(
                    self.services.notifier.notify(&summary, record.artifact_ref.as_deref()),
                    self.services.record_log.append_record(&record),
                );

                if let Err(e) = &notified {
                    log_sink_failure("operator", &record, e);
                    outcome.sink_failures += 1;
                }
                if let Err(e) = &appended {
                    log_sink_failure("record_log", &record, e);
                    outcome.sink_failures += 1;
                }
                if notified.is_ok() && appended.is_ok() {
                    log_record_forwarded(&record);
                }
            }
        }
    }
}

fn placement_for(message: Option<MessageRef>) -> MenuPlacement {
    message.map_or(MenuPlacement::Fresh, MenuPlacement::InPlace)
}
