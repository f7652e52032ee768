//! Fuzz target for session event sequences
//!
//! Drives a `SessionController` with arbitrary interleavings of user intents,
//! server events, and elapsed time, checking the standard session invariants
//! after every step.
//!
//! # Invariants
//!
//! - The local user is never shown as a remote typer
//! - Typing state and messages only exist for the active conversation
//! - The idle timer is armed exactly while self-typing
//! - `typing_start` and `typing_stop` strictly alternate
//! - NEVER panic on any event ordering

#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use parley_app::{Intent, SessionAction, SessionConfig, SessionController, SessionEvent};
use parley_harness::{InvariantRegistry, SessionSnapshot};
use parley_proto::{ConversationKind, InboundEvent, Message, OutboundEvent, payloads};

const USERS: [&str; 3] = ["me", "bob", "carol"];

#[derive(Debug, Clone, Arbitrary)]
enum Op {
    OpenPrivate { user: u8 },
    OpenChat { id: u8, user: u8 },
    JoinGroup { id: u8 },
    Input,
    Send { blank: bool },
    Blur,
    Close,
    Advance { ms: u16 },
    PrivateHistory { id: u8, user: u8 },
    GroupHistory { id: u8 },
    LiveMessage { group: bool, id: u8, user: u8 },
    RemoteTyping { group: bool, id: u8, user: u8 },
    RemoteStop { group: bool, id: u8, user: Option<u8> },
    Online { user: u8 },
    Offline { user: u8 },
}

fn user(index: u8) -> &'static str {
    USERS[usize::from(index) % USERS.len()]
}

fn id(raw: u8) -> u32 {
    u32::from(raw % 4)
}

fn kind(group: bool) -> ConversationKind {
    if group { ConversationKind::Group } else { ConversationKind::Private }
}

fn to_event(op: Op) -> Option<SessionEvent> {
    let event: SessionEvent = match op {
        Op::OpenPrivate { user: u } => Intent::OpenPrivate { username: user(u).into() }.into(),
        Op::OpenChat { id: i, user: u } => {
            Intent::OpenChat { chat_id: id(i).into(), peer: user(u).into() }.into()
        }
        Op::JoinGroup { id: i } => Intent::JoinGroup { group_id: id(i).into(), name: None }.into(),
        Op::Input => Intent::Input.into(),
        Op::Send { blank } => {
            Intent::Send { text: if blank { "  ".into() } else { "hello".into() } }.into()
        }
        Op::Blur => Intent::Blur.into(),
        Op::Close => Intent::Close.into(),
        Op::Advance { .. } => return None,
        Op::PrivateHistory { id: i, user: u } => {
            InboundEvent::PrivateHistory(payloads::chat::PrivateHistory {
                chat_id: id(i).into(),
                peer_name: user(u).into(),
                messages: vec![Message::new(user(u), "earlier", "")],
            })
            .into()
        }
        Op::GroupHistory { id: i } => InboundEvent::GroupHistory(payloads::chat::GroupHistory {
            group_id: id(i).into(),
            peer_name: "group".into(),
            messages: vec![],
        })
        .into(),
        Op::LiveMessage { group, id: i, user: u } => {
            let message = Message::new(user(u), "live", "");
            if group {
                InboundEvent::NewGroupMessage(payloads::chat::GroupMessage {
                    group_id: id(i).into(),
                    message,
                })
            } else {
                InboundEvent::NewPrivateMessage(payloads::chat::PrivateMessage {
                    chat_id: id(i).into(),
                    message,
                })
            }
            .into()
        }
        Op::RemoteTyping { group, id: i, user: u } => {
            InboundEvent::UserTyping(payloads::typing::TypingNotice {
                chat_type: Some(kind(group)),
                chat_id: id(i).into(),
                username: user(u).into(),
            })
            .into()
        }
        Op::RemoteStop { group, id: i, user: u } => {
            InboundEvent::UserStopTyping(payloads::typing::TypingStopped {
                chat_type: Some(kind(group)),
                chat_id: id(i).into(),
                username: u.map(|u| user(u).into()),
            })
            .into()
        }
        Op::Online { user: u } => {
            InboundEvent::UserOnline(payloads::presence::PresenceChange { username: user(u).into() })
                .into()
        }
        Op::Offline { user: u } => {
            InboundEvent::UserOffline(payloads::presence::PresenceChange { username: user(u).into() })
                .into()
        }
    };
    Some(event)
}

fuzz_target!(|ops: Vec<Op>| {
    let mut controller = SessionController::<Duration>::new(SessionConfig::new("me"));
    let invariants = InvariantRegistry::standard();
    let mut now = Duration::ZERO;
    let mut typing = false;

    for (i, op) in ops.into_iter().take(256).enumerate() {
        let actions = match op {
            Op::Advance { ms } => {
                now += Duration::from_millis(u64::from(ms));
                controller.tick(now)
            }
            other => match to_event(other) {
                Some(event) => controller.handle(event, now),
                None => continue,
            },
        };

        for action in &actions {
            match action {
                SessionAction::Emit(OutboundEvent::TypingStart(_)) => {
                    assert!(!typing, "typing_start while typing at step {i}");
                    typing = true;
                }
                SessionAction::Emit(OutboundEvent::TypingStop(_)) => {
                    assert!(typing, "typing_stop without typing_start at step {i}");
                    typing = false;
                }
                _ => {}
            }
        }

        let snapshot = SessionSnapshot::from_controller(&controller);
        invariants.assert_all(&snapshot, &format!("at step {i}"));
    }
});
