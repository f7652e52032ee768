//! Session error types.
//!
//! Every error here is recoverable: the rejected intent or event is dropped
//! and the session stays usable. The `Display` text of user-facing errors is
//! what the user sees.

use parley_proto::{ConversationKey, Username};
use thiserror::Error;

/// Reasons the session rejects an intent or an inbound event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Send attempted with no active conversation.
    #[error("Select a chat before sending a message.")]
    NotActive,

    /// Send attempted with blank text.
    #[error("Cannot send an empty message.")]
    EmptyMessage,

    /// Event for a conversation that is no longer (or not yet) active.
    #[error("stale event for {received}")]
    StaleResponse {
        /// Conversation named by the event.
        received: ConversationKey,
    },

    /// Private chat with oneself requested.
    #[error("You cannot start a chat with yourself ({username}).")]
    SelfTargetRejected {
        /// The local user.
        username: Username,
    },
}

impl SessionError {
    /// Whether the user should be told about this rejection.
    ///
    /// Stale responses are an expected race between switching conversations
    /// and server replies, not a fault.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::StaleResponse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_responses_are_silent() {
        assert!(!SessionError::StaleResponse { received: ConversationKey::group(1) }.is_user_facing());
    }

    #[test]
    fn rejected_intents_are_user_facing() {
        assert!(SessionError::NotActive.is_user_facing());
        assert!(SessionError::EmptyMessage.is_user_facing());
        assert!(
            SessionError::SelfTargetRejected { username: Username::from("alice") }.is_user_facing()
        );
    }
}
