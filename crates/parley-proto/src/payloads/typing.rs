//! Typing indicator payloads.

use serde::{Deserialize, Serialize};

use crate::{ConversationId, ConversationKey, ConversationKind, Username};

/// Local typing signal (`typing_start` / `typing_stop`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingSignal {
    /// Kind of the conversation being typed in.
    pub chat_type: ConversationKind,
    /// Conversation being typed in.
    pub chat_id: ConversationId,
}

impl From<ConversationKey> for TypingSignal {
    fn from(key: ConversationKey) -> Self {
        Self { chat_type: key.kind, chat_id: key.id }
    }
}

/// A remote user started typing.
///
/// Servers broadcast typing to the conversation's room and may leave out
/// `chat_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingNotice {
    /// Kind of the conversation being typed in, when the server names it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_type: Option<ConversationKind>,
    /// Conversation being typed in.
    pub chat_id: ConversationId,
    /// User who is typing.
    pub username: Username,
}

/// A remote user stopped typing.
///
/// The server does not always say who stopped, or in which kind of chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingStopped {
    /// Kind of the conversation, when the server names it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_type: Option<ConversationKind>,
    /// Conversation the typing stopped in.
    pub chat_id: ConversationId,
    /// User who stopped, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<Username>,
}

impl TypingNotice {
    /// Full conversation key, when the kind is known.
    pub fn key(&self) -> Option<ConversationKey> {
        self.chat_type.map(|kind| ConversationKey::new(kind, self.chat_id.clone()))
    }
}

impl TypingStopped {
    /// Full conversation key, when the kind is known.
    pub fn key(&self) -> Option<ConversationKey> {
        self.chat_type.map(|kind| ConversationKey::new(kind, self.chat_id.clone()))
    }
}
