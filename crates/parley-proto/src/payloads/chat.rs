//! Conversation history, join, and message payloads.

use serde::{Deserialize, Serialize};

use crate::{ConversationId, Message, Username, message::lenient_messages};

/// Ask the server to open (or create) the private chat with `other_user` and
/// send back its history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    /// Peer to chat with.
    pub other_user: Username,
}

/// Join a group and request its history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinGroup {
    /// Group to join.
    pub group_id: ConversationId,
}

/// Outgoing message in a private chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateSend {
    /// Target chat.
    pub chat_id: ConversationId,
    /// Trimmed message body.
    pub text: String,
}

/// Outgoing message in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSend {
    /// Target group.
    pub group_id: ConversationId,
    /// Trimmed message body.
    pub text: String,
}

/// History of a private chat, sent in reply to [`HistoryRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateHistory {
    /// Chat the history belongs to.
    pub chat_id: ConversationId,
    /// Other participant.
    #[serde(default, alias = "other_user")]
    pub peer_name: String,
    /// Messages in chronological order.
    #[serde(default, deserialize_with = "lenient_messages")]
    pub messages: Vec<Message>,
}

/// History of a group, sent in reply to [`JoinGroup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupHistory {
    /// Group the history belongs to.
    pub group_id: ConversationId,
    /// Group display name.
    #[serde(default, alias = "group_name")]
    pub peer_name: String,
    /// Messages in chronological order.
    #[serde(default, deserialize_with = "lenient_messages")]
    pub messages: Vec<Message>,
}

/// Live message pushed to a private chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateMessage {
    /// Chat the message was posted in.
    pub chat_id: ConversationId,
    /// The message.
    pub message: Message,
}

/// Live message pushed to a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMessage {
    /// Group the message was posted in.
    pub group_id: ConversationId,
    /// The message.
    pub message: Message,
}
