//! Conversation and user identity.
//!
//! A conversation is identified by its kind together with its id: a private
//! chat and a group may share the same numeric id on the server, so neither
//! half is meaningful alone. [`ConversationKey`] is that pair and is the only
//! thing session guards compare.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a conversation is one-to-one or a group.
///
/// Serialized as `"private"` / `"group"`, which is also the `chat_type` field
/// of typing payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationKind {
    /// One-to-one chat with a single peer.
    Private,
    /// Multi-member group chat.
    Group,
}

impl fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private => f.write_str("private"),
            Self::Group => f.write_str("group"),
        }
    }
}

/// Server-assigned conversation identifier.
///
/// The server is inconsistent about sending ids as JSON numbers or strings.
/// Both forms decode to the same value, so `7` and `"7"` compare equal.
/// Canonical decimal ids re-encode as numbers, anything else as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "RawId")]
pub struct ConversationId(String);

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl From<RawId> for ConversationId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        }
    }
}

impl From<ConversationId> for RawId {
    fn from(id: ConversationId) -> Self {
        match id.0.parse::<i64>() {
            Ok(n) if n.to_string() == id.0 => Self::Number(n),
            _ => Self::Text(id.0),
        }
    }
}

impl ConversationId {
    /// Create an id from its textual form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Textual form of the id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ConversationId {
                fn from(id: $ty) -> Self {
                    Self(id.to_string())
                }
            }
        )*
    };
}

impl_from_int!(i32, i64, u32, u64);

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account name of a chat user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Create a username.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Username as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Username {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for Username {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for Username {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a conversation: kind and id together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConversationKey {
    /// Private or group.
    pub kind: ConversationKind,
    /// Server-assigned id.
    pub id: ConversationId,
}

impl ConversationKey {
    /// Create a key.
    pub fn new(kind: ConversationKind, id: impl Into<ConversationId>) -> Self {
        Self { kind, id: id.into() }
    }

    /// Key for a private chat.
    pub fn private(id: impl Into<ConversationId>) -> Self {
        Self::new(ConversationKind::Private, id)
    }

    /// Key for a group.
    pub fn group(id: impl Into<ConversationId>) -> Self {
        Self::new(ConversationKind::Group, id)
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// A conversation the user can have open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRef {
    /// Private or group.
    pub kind: ConversationKind,
    /// Server-assigned id.
    pub id: ConversationId,
    /// Peer username for private chats, group name for groups.
    pub display_name: String,
}

impl ConversationRef {
    /// Reference to a private chat with `peer`.
    pub fn private(id: impl Into<ConversationId>, peer: impl Into<String>) -> Self {
        Self { kind: ConversationKind::Private, id: id.into(), display_name: peer.into() }
    }

    /// Reference to a group.
    pub fn group(id: impl Into<ConversationId>, name: impl Into<String>) -> Self {
        Self { kind: ConversationKind::Group, id: id.into(), display_name: name.into() }
    }

    /// Identity of this conversation.
    pub fn key(&self) -> ConversationKey {
        ConversationKey { kind: self.kind, id: self.id.clone() }
    }

    /// Whether `key` names this conversation (kind and id both equal).
    pub fn matches(&self, key: &ConversationKey) -> bool {
        self.kind == key.kind && self.id == key.id
    }

    /// Whether an event scoped to `id`, and to `kind` when the sender named
    /// one, belongs to this conversation.
    pub fn admits(&self, kind: Option<ConversationKind>, id: &ConversationId) -> bool {
        kind.is_none_or(|kind| kind == self.kind) && self.id == *id
    }

    /// The other participant of a private chat. `None` for groups.
    pub fn peer(&self) -> Option<&str> {
        match self.kind {
            ConversationKind::Private => Some(&self.display_name),
            ConversationKind::Group => None,
        }
    }
}
