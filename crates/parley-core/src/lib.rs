//! Parley session core
//!
//! Sans-IO state machines for a chat client's single active conversation.
//! Components consume explicit inputs (user intents, decoded channel events,
//! the current instant) and return [`SessionAction`]s for the caller to
//! execute. Nothing here touches a socket, a timer, or a screen, which keeps
//! every ordering race reproducible in tests.
//!
//! # Components
//!
//! - [`ConversationSession`]: `Idle -> Loading -> Active` conversation state
//!   machine and stale-response guard
//! - [`TypingCoordinator`]: debounced local typing signal and remote typer
//! - [`PresenceTracker`]: online user set and status rendering
//! - [`RenderOp`]: render instructions with all untrusted text pre-escaped

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod config;
pub mod env;
mod error;
mod escape;
mod presence;
mod session;
mod typing;
mod view;

pub use action::SessionAction;
pub use config::{DEFAULT_PREVIEW_LEN, DEFAULT_TYPING_IDLE, MAX_TYPING_IDLE, SessionConfig};
pub use error::SessionError;
pub use escape::{EscapedText, escape_html};
pub use parley_proto::{
    ConversationId, ConversationKey, ConversationKind, ConversationRef, Message, Username,
};
pub use presence::PresenceTracker;
pub use session::{ConversationSession, OpenTarget, SessionState};
pub use typing::{TypingCoordinator, TypingState, TypingTimer};
pub use view::{RenderOp, RenderedMessage, preview_text};
