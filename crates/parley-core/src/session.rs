//! Active conversation state machine.
//!
//! ```text
//!          open            history(match)
//!   Idle ────────▶ Loading ──────────────▶ Active
//!    ▲              │  ▲                     │
//!    │    close     │  └─────── open ────────┤
//!    └──────────────┴──────── close ─────────┘
//! ```
//!
//! `open` while `Loading` supersedes the pending request; its response, if it
//! ever arrives, fails the target match and is dropped as
//! [`SessionError::StaleResponse`]. There is no terminal state.
//!
//! This is the only component that changes which conversation is active.

use parley_proto::{
    ConversationId, ConversationKey, ConversationKind, ConversationRef, Message, OutboundEvent,
    Username,
    payloads::chat::{GroupSend, HistoryRequest, JoinGroup, PrivateSend},
};

use crate::{
    RenderOp, RenderedMessage, SessionAction, SessionError, escape_html,
    view::{EMPTY_HISTORY, IDLE_PLACEHOLDER, IDLE_TITLE},
};

/// What the user asked to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenTarget {
    /// Private chat with a user; the server assigns the chat id.
    Peer {
        /// User to chat with.
        username: Username,
    },
    /// Existing private chat whose id is already known.
    Private {
        /// Chat id.
        chat_id: ConversationId,
        /// Other participant.
        peer: Username,
    },
    /// Group chat.
    Group {
        /// Group id.
        group_id: ConversationId,
        /// Group name, if known before the history arrives.
        name: Option<String>,
    },
}

impl OpenTarget {
    /// History request to emit for this target.
    fn request(&self) -> OutboundEvent {
        match self {
            Self::Peer { username } | Self::Private { peer: username, .. } => {
                OutboundEvent::RequestPrivateHistory(HistoryRequest { other_user: username.clone() })
            },
            Self::Group { group_id, .. } => {
                OutboundEvent::JoinGroup(JoinGroup { group_id: group_id.clone() })
            },
        }
    }

    /// Human-readable name shown while loading.
    fn label(&self) -> String {
        match self {
            Self::Peer { username } | Self::Private { peer: username, .. } => username.to_string(),
            Self::Group { name: Some(name), .. } => name.clone(),
            Self::Group { group_id, name: None } => format!("group {group_id}"),
        }
    }

    /// Whether a history for `key` (with server-side name `peer_name`)
    /// answers this target.
    ///
    /// Private chats opened by username match on the peer name because the
    /// id is unknown until the server replies; everything else matches on
    /// the full key.
    fn accepts(&self, key: &ConversationKey, peer_name: &str) -> bool {
        match self {
            Self::Peer { username } => key.kind == ConversationKind::Private && username == peer_name,
            Self::Private { chat_id, .. } => key.kind == ConversationKind::Private && key.id == *chat_id,
            Self::Group { group_id, .. } => key.kind == ConversationKind::Group && key.id == *group_id,
        }
    }

    /// Conversation reference once the server has answered with `key`.
    fn resolve(&self, key: ConversationKey, peer_name: &str) -> ConversationRef {
        let display_name = match self {
            Self::Peer { username } | Self::Private { peer: username, .. } => username.to_string(),
            Self::Group { name: Some(name), .. } => name.clone(),
            Self::Group { .. } if !peer_name.is_empty() => peer_name.to_owned(),
            Self::Group { group_id, .. } => format!("group {group_id}"),
        };
        ConversationRef { kind: key.kind, id: key.id, display_name }
    }
}

/// Lifecycle of the conversation pane.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing open.
    #[default]
    Idle,
    /// History requested, waiting for the matching response.
    Loading {
        /// Pending target.
        target: OpenTarget,
    },
    /// Conversation open and accepting live messages.
    Active {
        /// The open conversation.
        conversation: ConversationRef,
    },
}

/// The active-conversation state machine.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    local_user: Username,
    state: SessionState,
    /// Messages of the active conversation, in display order.
    messages: Vec<Message>,
}

impl ConversationSession {
    /// Create an idle session for `local_user`.
    pub fn new(local_user: Username) -> Self {
        Self { local_user, state: SessionState::Idle, messages: Vec::new() }
    }

    /// Open `target`, tearing down whatever was open or loading.
    pub fn open(&mut self, target: OpenTarget) -> Vec<SessionAction> {
        let mut actions = self.teardown();

        tracing::info!(target_name = %target.label(), "opening conversation");
        actions.push(SessionAction::Emit(target.request()));
        actions.push(SessionAction::Render(RenderOp::Loading {
            target: escape_html(&target.label()),
        }));

        self.state = SessionState::Loading { target };
        actions
    }

    /// History arrived for `key`.
    ///
    /// Accepted only while loading and only if it answers the pending
    /// target; the message list is replaced wholesale.
    pub fn on_history_received(
        &mut self,
        key: ConversationKey,
        peer_name: &str,
        messages: Vec<Message>,
    ) -> Result<Vec<SessionAction>, SessionError> {
        let conversation = match &self.state {
            SessionState::Loading { target } if target.accepts(&key, peer_name) => {
                target.resolve(key, peer_name)
            },
            _ => return Err(SessionError::StaleResponse { received: key }),
        };

        tracing::info!(conversation = %conversation.key(), count = messages.len(), "history loaded");
        self.messages = messages;

        let mut actions = vec![
            SessionAction::Render(RenderOp::ClearMessages),
            SessionAction::Render(RenderOp::Title {
                kind: Some(conversation.kind),
                name: escape_html(&conversation.display_name),
            }),
        ];
        if let Some(peer) = conversation.peer() {
            actions.push(SessionAction::Render(RenderOp::ActivePeer {
                username: Some(Username::from(peer)),
            }));
        }

        if self.messages.is_empty() {
            actions.push(SessionAction::Render(RenderOp::notice(EMPTY_HISTORY)));
        } else {
            actions.extend(self.messages.iter().map(|message| {
                SessionAction::Render(RenderOp::Message(RenderedMessage::new(
                    message,
                    &self.local_user,
                )))
            }));
        }

        actions.push(SessionAction::Render(RenderOp::Input {
            enabled: true,
            placeholder: escape_html(&format!("Message {}...", conversation.display_name)),
        }));
        actions.push(SessionAction::Render(RenderOp::ScrollToBottom));

        self.state = SessionState::Active { conversation };
        Ok(actions)
    }

    /// Live message pushed for `key`. Accepted only for the active
    /// conversation.
    pub fn on_live_message(
        &mut self,
        key: &ConversationKey,
        message: Message,
    ) -> Result<Vec<SessionAction>, SessionError> {
        if !self.admits(key) {
            return Err(SessionError::StaleResponse { received: key.clone() });
        }

        let rendered = RenderedMessage::new(&message, &self.local_user);
        self.messages.push(message);
        Ok(vec![
            SessionAction::Render(RenderOp::Message(rendered)),
            SessionAction::Render(RenderOp::ScrollToBottom),
        ])
    }

    /// Send `text` to the active conversation.
    pub fn send(&self, text: &str) -> Result<Vec<SessionAction>, SessionError> {
        let SessionState::Active { conversation } = &self.state else {
            return Err(SessionError::NotActive);
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        tracing::debug!(conversation = %conversation.key(), len = text.len(), "sending message");
        let event = match conversation.kind {
            ConversationKind::Private => OutboundEvent::SendPrivateMessage(PrivateSend {
                chat_id: conversation.id.clone(),
                text: text.to_owned(),
            }),
            ConversationKind::Group => OutboundEvent::SendGroupMessage(GroupSend {
                group_id: conversation.id.clone(),
                text: text.to_owned(),
            }),
        };
        Ok(vec![SessionAction::Emit(event), SessionAction::Render(RenderOp::ClearInput)])
    }

    /// Close whatever is open or loading.
    pub fn close(&mut self) -> Vec<SessionAction> {
        self.teardown()
    }

    /// Discard the current conversation and its view.
    fn teardown(&mut self) -> Vec<SessionAction> {
        let previous = std::mem::take(&mut self.state);
        self.messages.clear();

        let peer = match &previous {
            SessionState::Idle => return vec![],
            SessionState::Loading { .. } => None,
            SessionState::Active { conversation } => {
                tracing::debug!(conversation = %conversation.key(), "closing conversation");
                conversation.peer().map(Username::from)
            },
        };

        let mut actions = vec![
            SessionAction::Render(RenderOp::ClearMessages),
            SessionAction::Render(RenderOp::Input {
                enabled: false,
                placeholder: escape_html(IDLE_PLACEHOLDER),
            }),
            SessionAction::Render(RenderOp::Title { kind: None, name: escape_html(IDLE_TITLE) }),
        ];
        if peer.is_some() {
            actions.push(SessionAction::Render(RenderOp::ActivePeer { username: None }));
        }
        actions
    }

    /// Whether `key` is the active conversation.
    pub fn admits(&self, key: &ConversationKey) -> bool {
        self.active().is_some_and(|conversation| conversation.matches(key))
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The active conversation. `None` while idle or loading.
    pub fn active(&self) -> Option<&ConversationRef> {
        match &self.state {
            SessionState::Active { conversation } => Some(conversation),
            SessionState::Idle | SessionState::Loading { .. } => None,
        }
    }

    /// Target being loaded. `None` unless loading.
    pub fn pending(&self) -> Option<&OpenTarget> {
        match &self.state {
            SessionState::Loading { target } => Some(target),
            SessionState::Idle | SessionState::Active { .. } => None,
        }
    }

    /// Messages of the active conversation.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}
