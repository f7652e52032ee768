//! Typed channel events.
//!
//! The channel carries `(name, payload)` pairs. Both enums are adjacently
//! tagged so that a serialized event is the envelope itself:
//! `{"event": "<name>", "payload": {...}}`.
//!
//! # Invariants
//!
//! Each variant maps to exactly one event name (enforced by match
//! exhaustiveness in `name()`), and the serde tag agrees with it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    ConversationKey, ProtocolError, Result,
    payloads::{
        chat::{
            GroupHistory, GroupMessage, GroupSend, HistoryRequest, JoinGroup, PrivateHistory,
            PrivateMessage, PrivateSend,
        },
        presence::{OnlineUsers, PresenceChange},
        typing::{TypingNotice, TypingSignal, TypingStopped},
    },
};

/// Events the client emits on the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// Open a private chat and request its history.
    RequestPrivateHistory(HistoryRequest),
    /// Join a group and request its history.
    JoinGroup(JoinGroup),
    /// Post a message to a private chat.
    SendPrivateMessage(PrivateSend),
    /// Post a message to a group.
    SendGroupMessage(GroupSend),
    /// Local user started typing.
    TypingStart(TypingSignal),
    /// Local user stopped typing.
    TypingStop(TypingSignal),
}

impl OutboundEvent {
    /// Event name on the channel.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RequestPrivateHistory(_) => "request_private_history",
            Self::JoinGroup(_) => "join_group",
            Self::SendPrivateMessage(_) => "send_private_message",
            Self::SendGroupMessage(_) => "send_group_message",
            Self::TypingStart(_) => "typing_start",
            Self::TypingStop(_) => "typing_stop",
        }
    }

    /// Payload object on its own, for channels that take name and payload
    /// separately.
    pub fn payload(&self) -> Result<Value> {
        let encoded = match self {
            Self::RequestPrivateHistory(p) => serde_json::to_value(p),
            Self::JoinGroup(p) => serde_json::to_value(p),
            Self::SendPrivateMessage(p) => serde_json::to_value(p),
            Self::SendGroupMessage(p) => serde_json::to_value(p),
            Self::TypingStart(p) | Self::TypingStop(p) => serde_json::to_value(p),
        };
        encoded.map_err(|e| ProtocolError::Encode { event: self.name(), reason: e.to_string() })
    }
}

/// Events the server pushes on the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum InboundEvent {
    /// A user came online.
    UserOnline(PresenceChange),
    /// A user went offline.
    UserOffline(PresenceChange),
    /// Complete set of online users.
    OnlineUsersSnapshot(OnlineUsers),
    /// History of a private chat.
    PrivateHistory(PrivateHistory),
    /// History of a group.
    GroupHistory(GroupHistory),
    /// Live message in a private chat.
    NewPrivateMessage(PrivateMessage),
    /// Live message in a group.
    NewGroupMessage(GroupMessage),
    /// A remote user started typing.
    UserTyping(TypingNotice),
    /// A remote user stopped typing.
    UserStopTyping(TypingStopped),
}

/// Every inbound event name, in declaration order.
const INBOUND_NAMES: [&str; 9] = [
    "user_online",
    "user_offline",
    "online_users_snapshot",
    "private_history",
    "group_history",
    "new_private_message",
    "new_group_message",
    "user_typing",
    "user_stop_typing",
];

impl InboundEvent {
    /// Decode an event from its channel name and payload.
    ///
    /// Never panics: unknown names and mismatched payloads are reported as
    /// [`ProtocolError`] for the caller to log and drop.
    pub fn decode(name: &str, payload: Value) -> Result<Self> {
        if !INBOUND_NAMES.contains(&name) {
            return Err(ProtocolError::UnknownEvent { name: name.to_owned() });
        }

        let envelope = serde_json::json!({ "event": name, "payload": payload });
        serde_json::from_value(envelope)
            .map_err(|e| ProtocolError::Malformed { event: name.to_owned(), reason: e.to_string() })
    }

    /// Event name on the channel.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserOnline(_) => "user_online",
            Self::UserOffline(_) => "user_offline",
            Self::OnlineUsersSnapshot(_) => "online_users_snapshot",
            Self::PrivateHistory(_) => "private_history",
            Self::GroupHistory(_) => "group_history",
            Self::NewPrivateMessage(_) => "new_private_message",
            Self::NewGroupMessage(_) => "new_group_message",
            Self::UserTyping(_) => "user_typing",
            Self::UserStopTyping(_) => "user_stop_typing",
        }
    }

    /// Conversation the event is scoped to. `None` for presence events and
    /// for typing events that do not name the conversation kind.
    pub fn conversation(&self) -> Option<ConversationKey> {
        match self {
            Self::UserOnline(_) | Self::UserOffline(_) | Self::OnlineUsersSnapshot(_) => None,
            Self::PrivateHistory(p) => Some(ConversationKey::private(p.chat_id.clone())),
            Self::GroupHistory(p) => Some(ConversationKey::group(p.group_id.clone())),
            Self::NewPrivateMessage(p) => Some(ConversationKey::private(p.chat_id.clone())),
            Self::NewGroupMessage(p) => Some(ConversationKey::group(p.group_id.clone())),
            Self::UserTyping(p) => p.key(),
            Self::UserStopTyping(p) => p.key(),
        }
    }
}

/// Untyped `{event, payload}` pair as it appears on a line-oriented channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event name.
    pub event: String,
    /// Payload object. Missing payloads decode as `null`.
    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    /// Parse one JSON line.
    pub fn parse(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(|e| ProtocolError::InvalidEnvelope(e.to_string()))
    }

    /// Decode as an inbound event.
    pub fn into_inbound(self) -> Result<InboundEvent> {
        InboundEvent::decode(&self.event, self.payload)
    }
}

impl TryFrom<&OutboundEvent> for Envelope {
    type Error = ProtocolError;

    fn try_from(event: &OutboundEvent) -> Result<Self> {
        Ok(Self { event: event.name().to_owned(), payload: event.payload()? })
    }
}
