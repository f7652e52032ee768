//! Observable state snapshots for invariant checking.
//!
//! Invariants operate on snapshots rather than live state so every check in
//! one pass sees the same state.

use parley_app::SessionController;
use parley_core::{ConversationRef, SessionState, Username, env::MonotonicInstant};

/// Snapshot of one session's observable state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// The signed-in user.
    pub local_user: Username,
    /// Active conversation. `None` while idle or loading.
    pub active: Option<ConversationRef>,
    /// Whether a history request is outstanding.
    pub loading: bool,
    /// Number of messages held for the active conversation.
    pub message_count: usize,
    /// Whether `typing_start` was sent without a matching stop.
    pub self_typing: bool,
    /// Remote user shown as typing.
    pub remote_typer: Option<Username>,
    /// Whether the typing idle timer is armed.
    pub deadline_armed: bool,
}

impl SessionSnapshot {
    /// Capture the observable state of `controller`.
    pub fn from_controller<I: MonotonicInstant>(controller: &SessionController<I>) -> Self {
        let typing = controller.typing();
        Self {
            local_user: controller.config().local_user.clone(),
            active: controller.active().cloned(),
            loading: matches!(controller.state(), SessionState::Loading { .. }),
            message_count: controller.messages().len(),
            self_typing: typing.self_typing,
            remote_typer: typing.remote_typer,
            deadline_armed: controller.next_deadline().is_some(),
        }
    }

    /// Snapshot of an idle session for `local_user`.
    pub fn idle(local_user: impl Into<Username>) -> Self {
        Self { local_user: local_user.into(), ..Self::default() }
    }
}
