//! Render operations handed to the view sink.
//!
//! The sink owns presentation. It receives a stream of [`RenderOp`]s and is
//! expected to apply them in order; every piece of user-supplied text is
//! already an [`EscapedText`].

use parley_proto::{ConversationKey, ConversationKind, Message, Username};
use serde::Serialize;

use crate::{EscapedText, escape_html};

/// Placeholder shown in the input box when no conversation is open.
pub(crate) const IDLE_PLACEHOLDER: &str = "Select a chat to start messaging...";

/// Title shown when no conversation is open.
pub(crate) const IDLE_TITLE: &str = "Select a chat";

/// Notice rendered for an empty history.
pub(crate) const EMPTY_HISTORY: &str = "No messages yet. Start the conversation!";

/// Preview shown for a message without text.
const EMPTY_PREVIEW: &str = "No messages";

/// A single instruction for the view sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderOp {
    /// Remove every message from the transcript.
    ClearMessages,
    /// Show a loading placeholder while history is requested.
    Loading {
        /// Who or what is being loaded.
        target: EscapedText,
    },
    /// Append a message to the transcript.
    Message(RenderedMessage),
    /// Append a system notice to the transcript.
    Notice {
        /// Notice text.
        text: EscapedText,
    },
    /// Tell the user an action was rejected.
    Alert {
        /// Alert text.
        text: EscapedText,
    },
    /// Set the conversation title. `kind` is `None` when nothing is open.
    Title {
        /// Kind of the open conversation.
        kind: Option<ConversationKind>,
        /// Title text.
        name: EscapedText,
    },
    /// Enable or disable the message input.
    Input {
        /// Whether typing and sending are allowed.
        enabled: bool,
        /// Input placeholder.
        placeholder: EscapedText,
    },
    /// Empty the message input.
    ClearInput,
    /// Show or hide the typing indicator.
    TypingIndicator {
        /// Remote typer, `None` to hide.
        username: Option<EscapedText>,
    },
    /// Highlight the peer of the open private chat. `None` clears it.
    ActivePeer {
        /// Highlighted user.
        username: Option<Username>,
    },
    /// Update a user's online badge.
    UserStatus {
        /// User whose status changed.
        username: Username,
        /// Whether the user is online.
        online: bool,
    },
    /// Update the online user counter.
    OnlineCount {
        /// Number of online users.
        count: usize,
    },
    /// Update the last-message preview in the conversation list.
    Preview {
        /// Conversation the preview belongs to.
        conversation: ConversationKey,
        /// Truncated message text.
        text: EscapedText,
    },
    /// Scroll the transcript to the newest message.
    ScrollToBottom,
}

/// A message prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMessage {
    /// Author name.
    pub author: EscapedText,
    /// Message body.
    pub text: EscapedText,
    /// Time of day.
    pub timestamp: EscapedText,
    /// Whether the local user wrote it.
    pub own: bool,
}

impl RenderedMessage {
    /// Escape `message` for display to `local_user`.
    pub fn new(message: &Message, local_user: &Username) -> Self {
        Self {
            author: escape_html(message.author.as_str()),
            text: escape_html(&message.text),
            timestamp: escape_html(&message.timestamp),
            own: message.author == *local_user,
        }
    }
}

impl RenderOp {
    /// System notice with raw `text`.
    pub fn notice(text: &str) -> Self {
        Self::Notice { text: escape_html(text) }
    }

    /// Alert with raw `text`.
    pub fn alert(text: &str) -> Self {
        Self::Alert { text: escape_html(text) }
    }
}

/// Conversation-list preview for a message body.
///
/// Truncates to `max_chars` characters (not bytes) and appends `...`.
pub fn preview_text(text: &str, max_chars: usize) -> String {
    if text.is_empty() {
        return EMPTY_PREVIEW.to_owned();
    }

    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_by_characters() {
        assert_eq!(preview_text("short", 25), "short");
        assert_eq!(preview_text("abcdef", 3), "abc...");
        assert_eq!(preview_text("жжжжж", 2), "жж...");
        assert_eq!(preview_text("", 25), "No messages");
    }

    #[test]
    fn preview_at_exact_length_is_not_truncated() {
        assert_eq!(preview_text("abc", 3), "abc");
    }

    #[test]
    fn rendered_message_escapes_every_field() {
        let message = Message::new("<b>eve</b>", "<script>x</script>", "<i>");
        let rendered = RenderedMessage::new(&message, &Username::from("alice"));

        assert_eq!(rendered.author.as_str(), "&lt;b&gt;eve&lt;/b&gt;");
        assert_eq!(rendered.text.as_str(), "&lt;script&gt;x&lt;/script&gt;");
        assert_eq!(rendered.timestamp.as_str(), "&lt;i&gt;");
        assert!(!rendered.own);
    }

    #[test]
    fn own_messages_are_flagged() {
        let message = Message::new("alice", "hi", "10:00");
        assert!(RenderedMessage::new(&message, &Username::from("alice")).own);
    }

    #[test]
    fn render_ops_serialize_with_op_tag() {
        let value = serde_json::to_value(RenderOp::OnlineCount { count: 3 }).unwrap();
        assert_eq!(value, serde_json::json!({ "op": "online_count", "count": 3 }));
    }
}
