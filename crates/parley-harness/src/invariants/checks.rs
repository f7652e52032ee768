//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use super::{Invariant, InvariantResult, SessionSnapshot, Violation};

/// The local user is never displayed as a remote typer.
pub struct RemoteTyperNotSelf;

impl Invariant for RemoteTyperNotSelf {
    fn name(&self) -> &'static str {
        "remote_typer_not_self"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        match &state.remote_typer {
            Some(typer) if *typer == state.local_user => Err(Violation {
                invariant: self.name(),
                message: format!("local user {typer} shown as remote typer"),
            }),
            _ => Ok(()),
        }
    }
}

/// Typing state only exists for an active conversation.
///
/// Self-typing and a displayed remote typer both imply `Active`; a switch or
/// close must have cleared them.
pub struct TypingScopedToActive;

impl Invariant for TypingScopedToActive {
    fn name(&self) -> &'static str {
        "typing_scoped_to_active"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.active.is_some() {
            return Ok(());
        }
        if state.self_typing {
            return Err(Violation {
                invariant: self.name(),
                message: "self-typing with no active conversation".into(),
            });
        }
        if let Some(typer) = &state.remote_typer {
            return Err(Violation {
                invariant: self.name(),
                message: format!("remote typer {typer} shown with no active conversation"),
            });
        }
        Ok(())
    }
}

/// The message list is empty unless a conversation is active.
pub struct MessagesOnlyWhenActive;

impl Invariant for MessagesOnlyWhenActive {
    fn name(&self) -> &'static str {
        "messages_only_when_active"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.active.is_none() && state.message_count > 0 {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "{} messages held while {}",
                    state.message_count,
                    if state.loading { "loading" } else { "idle" }
                ),
            });
        }
        Ok(())
    }
}

/// The typing idle timer is armed exactly while self-typing.
///
/// An armed timer without a pending `typing_start` would emit a stray stop;
/// self-typing without a timer would never emit one.
pub struct DeadlineMatchesTyping;

impl Invariant for DeadlineMatchesTyping {
    fn name(&self) -> &'static str {
        "deadline_matches_typing"
    }

    fn check(&self, state: &SessionSnapshot) -> InvariantResult {
        if state.deadline_armed != state.self_typing {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "timer armed: {}, self-typing: {}",
                    state.deadline_armed, state.self_typing
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use parley_core::{ConversationRef, Username};

    use super::*;

    fn active() -> SessionSnapshot {
        SessionSnapshot {
            active: Some(ConversationRef::private(1, "bob")),
            ..SessionSnapshot::idle("alice")
        }
    }

    #[test]
    fn self_as_remote_typer_violates() {
        let state = SessionSnapshot { remote_typer: Some(Username::from("alice")), ..active() };
        assert!(RemoteTyperNotSelf.check(&state).is_err());

        let state = SessionSnapshot { remote_typer: Some(Username::from("bob")), ..active() };
        assert!(RemoteTyperNotSelf.check(&state).is_ok());
    }

    #[test]
    fn typing_without_active_violates() {
        let state = SessionSnapshot { self_typing: true, ..SessionSnapshot::idle("alice") };
        assert!(TypingScopedToActive.check(&state).is_err());

        let state = SessionSnapshot { self_typing: true, ..active() };
        assert!(TypingScopedToActive.check(&state).is_ok());
    }

    #[test]
    fn messages_while_loading_violate() {
        let state =
            SessionSnapshot { loading: true, message_count: 2, ..SessionSnapshot::idle("alice") };
        let violation = MessagesOnlyWhenActive.check(&state).unwrap_err();
        assert_eq!(violation.message, "2 messages held while loading");
    }

    #[test]
    fn orphaned_deadline_violates() {
        let state = SessionSnapshot { deadline_armed: true, ..active() };
        assert!(DeadlineMatchesTyping.check(&state).is_err());
    }
}
