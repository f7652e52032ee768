//! Session controller.
//!
//! This module defines [`SessionController`], the single owner of all
//! session state for one connection. It is a pure state machine: it consumes
//! [`crate::SessionEvent`]s plus the current instant and produces
//! [`SessionAction`]s for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Routes presence events to [`PresenceTracker`], histories and live
//!   messages to [`ConversationSession`], typing events to
//!   [`TypingCoordinator`].
//! - Tears typing state down before every conversation switch, so the
//!   `typing_stop` for the old conversation precedes the new history request.
//! - Keeps conversation-list previews current for every live message,
//!   including messages for conversations that are not open.
//! - Turns rejections into user-facing alerts, except stale responses which
//!   are dropped silently.

use std::collections::{BTreeMap, BTreeSet};

use parley_core::{
    ConversationId, ConversationKey, ConversationRef, ConversationSession, Message, OpenTarget,
    PresenceTracker, RenderOp, SessionAction, SessionConfig, SessionError, SessionState,
    TypingCoordinator, TypingState, Username, env::MonotonicInstant, escape_html, preview_text,
};
use parley_proto::InboundEvent;

use crate::{Intent, SessionEvent};

/// Orchestrates the session components for one connection.
///
/// Generic over the instant type so simulation can use virtual time.
#[derive(Debug, Clone)]
pub struct SessionController<I> {
    config: SessionConfig,
    session: ConversationSession,
    typing: TypingCoordinator<I>,
    presence: PresenceTracker,
    /// Last-message preview per conversation.
    previews: BTreeMap<ConversationKey, String>,
}

impl<I: MonotonicInstant> SessionController<I> {
    /// Create a controller with nothing open.
    pub fn new(config: SessionConfig) -> Self {
        let session = ConversationSession::new(config.local_user.clone());
        let typing = TypingCoordinator::new(config.local_user.clone(), config.typing_idle);
        let presence = PresenceTracker::new(config.contacts.iter().cloned());
        Self { config, session, typing, presence, previews: BTreeMap::new() }
    }

    /// Process an event observed at `now`.
    pub fn handle(&mut self, event: SessionEvent, now: I) -> Vec<SessionAction> {
        match event {
            SessionEvent::Intent(intent) => self.handle_intent(intent, now),
            SessionEvent::Inbound(event) => self.handle_inbound(event),
        }
    }

    fn handle_intent(&mut self, intent: Intent, now: I) -> Vec<SessionAction> {
        match intent {
            Intent::OpenPrivate { username } => self.open_private_chat(username),
            Intent::OpenChat { chat_id, peer } => self.open_chat(chat_id, peer),
            Intent::JoinGroup { group_id, name } => self.join_group(group_id, name),
            Intent::Input => self.input(now),
            Intent::Send { text } => self.send(&text),
            Intent::Blur => self.blur(),
            Intent::Close => self.close(),
        }
    }

    /// Process a decoded channel event.
    pub fn handle_inbound(&mut self, event: InboundEvent) -> Vec<SessionAction> {
        tracing::trace!(event = event.name(), "inbound event");
        match event {
            InboundEvent::UserOnline(p) => {
                self.presence.apply_online(&p.username, self.session.active())
            },
            InboundEvent::UserOffline(p) => {
                self.presence.apply_offline(&p.username, self.session.active())
            },
            InboundEvent::OnlineUsersSnapshot(p) => self.presence.apply_snapshot(p.users),
            InboundEvent::PrivateHistory(p) => {
                self.history(ConversationKey::private(p.chat_id), &p.peer_name, p.messages)
            },
            InboundEvent::GroupHistory(p) => {
                self.history(ConversationKey::group(p.group_id), &p.peer_name, p.messages)
            },
            InboundEvent::NewPrivateMessage(p) => {
                self.live_message(ConversationKey::private(p.chat_id), p.message)
            },
            InboundEvent::NewGroupMessage(p) => {
                self.live_message(ConversationKey::group(p.group_id), p.message)
            },
            InboundEvent::UserTyping(p) => self.typing.on_remote_typing_start(
                self.session.active(),
                p.chat_type,
                &p.chat_id,
                &p.username,
            ),
            InboundEvent::UserStopTyping(p) => self.typing.on_remote_typing_stop(
                self.session.active(),
                p.chat_type,
                &p.chat_id,
                p.username.as_ref(),
            ),
        }
    }

    /// Start (or resume) the private chat with `username`.
    pub fn open_private_chat(&mut self, username: Username) -> Vec<SessionAction> {
        if username == self.config.local_user {
            return self.reject(&SessionError::SelfTargetRejected { username });
        }
        self.open(OpenTarget::Peer { username })
    }

    /// Open a private chat whose id is already known.
    pub fn open_chat(&mut self, chat_id: ConversationId, peer: Username) -> Vec<SessionAction> {
        if peer == self.config.local_user {
            return self.reject(&SessionError::SelfTargetRejected { username: peer });
        }
        self.open(OpenTarget::Private { chat_id, peer })
    }

    /// Open a group.
    pub fn join_group(
        &mut self,
        group_id: ConversationId,
        name: Option<String>,
    ) -> Vec<SessionAction> {
        self.open(OpenTarget::Group { group_id, name })
    }

    fn open(&mut self, target: OpenTarget) -> Vec<SessionAction> {
        let mut actions = self.typing.reset();
        actions.extend(self.session.open(target));
        actions
    }

    /// Keystroke in the message input at `now`.
    pub fn input(&mut self, now: I) -> Vec<SessionAction> {
        self.typing.on_local_input(self.session.active(), now)
    }

    /// Send the input contents to the active conversation.
    pub fn send(&mut self, text: &str) -> Vec<SessionAction> {
        match self.session.send(text) {
            Ok(mut actions) => {
                actions.extend(self.typing.stop());
                actions
            },
            Err(e) => self.reject(&e),
        }
    }

    /// Message input lost focus.
    pub fn blur(&mut self) -> Vec<SessionAction> {
        self.typing.stop()
    }

    /// Close the open conversation.
    pub fn close(&mut self) -> Vec<SessionAction> {
        let mut actions = self.typing.reset();
        actions.extend(self.session.close());
        actions
    }

    /// Time passed; fires the typing idle deadline if it is due.
    pub fn tick(&mut self, now: I) -> Vec<SessionAction> {
        self.typing.on_tick(now)
    }

    fn history(
        &mut self,
        key: ConversationKey,
        peer_name: &str,
        messages: Vec<Message>,
    ) -> Vec<SessionAction> {
        match self.session.on_history_received(key, peer_name, messages) {
            Ok(actions) => actions,
            Err(e) => self.reject(&e),
        }
    }

    fn live_message(&mut self, key: ConversationKey, message: Message) -> Vec<SessionAction> {
        let preview = preview_text(&message.text, self.config.preview_len);

        let mut actions = match self.session.on_live_message(&key, message) {
            Ok(actions) => actions,
            Err(e) => self.reject(&e),
        };

        actions.push(SessionAction::Render(RenderOp::Preview {
            conversation: key.clone(),
            text: escape_html(&preview),
        }));
        self.previews.insert(key, preview);
        actions
    }

    fn reject(&self, error: &SessionError) -> Vec<SessionAction> {
        if error.is_user_facing() {
            tracing::info!(%error, "rejected");
            vec![SessionAction::Render(RenderOp::alert(&error.to_string()))]
        } else {
            tracing::debug!(%error, "dropped");
            vec![]
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Conversation lifecycle state.
    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    /// The active conversation. `None` while idle or loading.
    pub fn active(&self) -> Option<&ConversationRef> {
        self.session.active()
    }

    /// Messages of the active conversation.
    pub fn messages(&self) -> &[Message] {
        self.session.messages()
    }

    /// Typing state of the active conversation.
    pub fn typing(&self) -> TypingState {
        self.typing.state()
    }

    /// Users currently online.
    pub fn online(&self) -> &BTreeSet<Username> {
        self.presence.online()
    }

    /// Last-message preview per conversation.
    pub fn previews(&self) -> &BTreeMap<ConversationKey, String> {
        &self.previews
    }

    /// When the runtime must call [`Self::tick`] next. `None` if no timer is
    /// armed.
    pub fn next_deadline(&self) -> Option<I> {
        self.typing.deadline()
    }
}
