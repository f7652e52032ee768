//! Typing indicator coordination.
//!
//! Local side: the first keystroke of a burst emits `typing_start`; each
//! further keystroke only pushes the idle deadline back. When the deadline
//! passes (or on blur, send, or a conversation switch) exactly one
//! `typing_stop` is emitted for the conversation the burst started in.
//!
//! Remote side: a single remote typer is displayed per conversation, last
//! writer wins.
//!
//! The timer is a plain deadline owned by the coordinator. The runtime feeds
//! ticks; nothing fires behind the coordinator's back, and cancelling is
//! clearing the deadline.

use std::time::Duration;

use parley_proto::{
    ConversationId, ConversationKey, ConversationKind, ConversationRef, OutboundEvent, Username,
};

use crate::{
    RenderOp, SessionAction, config::MAX_TYPING_IDLE, env::MonotonicInstant, escape_html,
};

/// Cancellable single-shot deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingTimer<I> {
    deadline: Option<I>,
}

impl<I> Default for TypingTimer<I> {
    fn default() -> Self {
        Self { deadline: None }
    }
}

impl<I: MonotonicInstant> TypingTimer<I> {
    /// (Re)arm the timer to fire `after` from `now`.
    pub fn arm(&mut self, now: I, after: Duration) {
        self.deadline = Some(now + after);
    }

    /// Disarm. Returns whether the timer was armed.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Whether the timer is armed and its deadline has passed at `now`.
    pub fn expired(&self, now: I) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Pending deadline, if armed.
    pub fn deadline(&self) -> Option<I> {
        self.deadline
    }
}

/// Observable typing state of the active conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypingState {
    /// Whether `typing_start` has been sent without a matching stop.
    pub self_typing: bool,
    /// Remote user currently shown as typing.
    pub remote_typer: Option<Username>,
}

/// Debounced typing signals and the remote typing indicator.
#[derive(Debug, Clone)]
pub struct TypingCoordinator<I> {
    local_user: Username,
    idle: Duration,
    timer: TypingTimer<I>,
    /// Conversation a `typing_start` was sent for. `Some` iff self-typing.
    signaled: Option<ConversationKey>,
    remote_typer: Option<Username>,
}

impl<I: MonotonicInstant> TypingCoordinator<I> {
    /// Create a coordinator for `local_user` with the given idle window,
    /// clamped to [`MAX_TYPING_IDLE`] so arming the timer cannot overflow.
    pub fn new(local_user: Username, idle: Duration) -> Self {
        Self {
            local_user,
            idle: idle.min(MAX_TYPING_IDLE),
            timer: TypingTimer::default(),
            signaled: None,
            remote_typer: None,
        }
    }

    /// Local keystroke in the active conversation.
    ///
    /// Emits `typing_start` at most once per burst. A burst whose deadline
    /// already passed is closed first, so a late keystroke yields stop then
    /// start even if no tick arrived in between.
    pub fn on_local_input(
        &mut self,
        active: Option<&ConversationRef>,
        now: I,
    ) -> Vec<SessionAction> {
        let Some(active) = active else {
            return vec![];
        };

        let mut actions = Vec::new();
        if self.timer.expired(now) {
            actions.extend(self.stop());
        }

        let key = active.key();
        if self.signaled.as_ref() != Some(&key) {
            actions.extend(self.stop());
            tracing::trace!(conversation = %key, "typing started");
            actions.push(SessionAction::Emit(OutboundEvent::TypingStart(key.clone().into())));
            self.signaled = Some(key);
        }

        self.timer.arm(now, self.idle);
        actions
    }

    /// Time passed. Closes the burst if the idle deadline has been reached.
    pub fn on_tick(&mut self, now: I) -> Vec<SessionAction> {
        if self.timer.expired(now) { self.stop() } else { vec![] }
    }

    /// End the current burst (blur, send, or idle). No-op when not typing.
    pub fn stop(&mut self) -> Vec<SessionAction> {
        self.timer.cancel();
        match self.signaled.take() {
            Some(key) => {
                tracing::trace!(conversation = %key, "typing stopped");
                vec![SessionAction::Emit(OutboundEvent::TypingStop(key.into()))]
            },
            None => vec![],
        }
    }

    /// Conversation switched or closed.
    ///
    /// Stops local typing and clears the remote typer unconditionally.
    pub fn reset(&mut self) -> Vec<SessionAction> {
        let mut actions = self.stop();
        self.remote_typer = None;
        actions.push(SessionAction::Render(RenderOp::TypingIndicator { username: None }));
        actions
    }

    /// A remote user started typing in conversation `chat_id`.
    ///
    /// Ignored unless the event belongs to the active conversation and the
    /// typer is not the local user. Without a `kind` the id alone decides.
    pub fn on_remote_typing_start(
        &mut self,
        active: Option<&ConversationRef>,
        kind: Option<ConversationKind>,
        chat_id: &ConversationId,
        username: &Username,
    ) -> Vec<SessionAction> {
        if !active.is_some_and(|a| a.admits(kind, chat_id)) {
            tracing::debug!(%chat_id, %username, "dropping typing for inactive chat");
            return vec![];
        }
        if *username == self.local_user {
            return vec![];
        }

        self.remote_typer = Some(username.clone());
        vec![
            SessionAction::Render(RenderOp::TypingIndicator {
                username: Some(escape_html(username.as_str())),
            }),
            SessionAction::Render(RenderOp::ScrollToBottom),
        ]
    }

    /// A remote user stopped typing in conversation `chat_id`.
    ///
    /// When the server names who stopped, the indicator is only cleared if
    /// that user is the one displayed.
    pub fn on_remote_typing_stop(
        &mut self,
        active: Option<&ConversationRef>,
        kind: Option<ConversationKind>,
        chat_id: &ConversationId,
        username: Option<&Username>,
    ) -> Vec<SessionAction> {
        if !active.is_some_and(|a| a.admits(kind, chat_id)) {
            tracing::debug!(%chat_id, "dropping typing stop for inactive chat");
            return vec![];
        }
        if username.is_some() && username != self.remote_typer.as_ref() {
            return vec![];
        }

        self.remote_typer = None;
        vec![SessionAction::Render(RenderOp::TypingIndicator { username: None })]
    }

    /// Current typing state.
    pub fn state(&self) -> TypingState {
        TypingState { self_typing: self.signaled.is_some(), remote_typer: self.remote_typer.clone() }
    }

    /// Pending idle deadline, for runtimes that sleep until it.
    pub fn deadline(&self) -> Option<I> {
        self.timer.deadline()
    }
}
