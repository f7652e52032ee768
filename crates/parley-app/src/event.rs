//! Controller input events.
//!
//! Events originate from two distinct sources:
//! - User intents (clicks, keystrokes, focus changes).
//! - Notifications decoded from the event channel.
//!
//! Neither carries a timestamp; the runtime supplies `now` when it hands an
//! event to the controller.

use parley_proto::{ConversationId, InboundEvent, Username};
use serde::{Deserialize, Serialize};

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Start (or resume) the private chat with a user.
    OpenPrivate {
        /// User to chat with.
        username: Username,
    },
    /// Open a private chat from the conversation list.
    OpenChat {
        /// Known chat id.
        chat_id: ConversationId,
        /// Other participant.
        peer: Username,
    },
    /// Open a group.
    JoinGroup {
        /// Group id.
        group_id: ConversationId,
        /// Group name, if the list shows one.
        #[serde(default)]
        name: Option<String>,
    },
    /// Keystroke in the message input.
    Input,
    /// Send button or Enter.
    Send {
        /// Raw input contents.
        text: String,
    },
    /// Message input lost focus.
    Blur,
    /// Close the open conversation.
    Close,
}

/// Events processed by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// User intent.
    Intent(Intent),
    /// Decoded channel event.
    Inbound(InboundEvent),
}

impl From<Intent> for SessionEvent {
    fn from(intent: Intent) -> Self {
        Self::Intent(intent)
    }
}

impl From<InboundEvent> for SessionEvent {
    fn from(event: InboundEvent) -> Self {
        Self::Inbound(event)
    }
}
