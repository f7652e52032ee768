//! Property-based tests for the session controller.
//!
//! Tests verify that invariants hold under arbitrary interleavings of user
//! intents, server events, and time.

use std::time::Duration;

use parley_app::{Intent, SessionAction, SessionConfig, SessionController, SessionEvent};
use parley_core::{ConversationKind, Message};
use parley_harness::{InvariantRegistry, SessionSnapshot};
use parley_proto::{
    InboundEvent, OutboundEvent,
    payloads::{
        chat::{GroupHistory, GroupMessage, PrivateHistory, PrivateMessage},
        presence::PresenceChange,
        typing::{TypingNotice, TypingStopped},
    },
};
use proptest::prelude::*;

const USERS: [&str; 4] = ["me", "bob", "carol", "dave"];

fn user() -> impl Strategy<Value = &'static str> {
    prop::sample::select(USERS.to_vec())
}

fn kind() -> impl Strategy<Value = ConversationKind> {
    prop_oneof![Just(ConversationKind::Private), Just(ConversationKind::Group)]
}

/// Generate random user intents.
fn intent_strategy() -> impl Strategy<Value = Intent> {
    prop_oneof![
        2 => user().prop_map(|u| Intent::OpenPrivate { username: u.into() }),
        1 => (1u64..4, user()).prop_map(|(id, u)| Intent::OpenChat { chat_id: id.into(), peer: u.into() }),
        1 => (1u64..4).prop_map(|id| Intent::JoinGroup { group_id: id.into(), name: None }),
        4 => Just(Intent::Input),
        1 => prop_oneof![Just(""), Just("  "), Just("hi")].prop_map(|t| Intent::Send { text: t.into() }),
        1 => Just(Intent::Blur),
        1 => Just(Intent::Close),
    ]
}

/// Generate random server events over a small id space so collisions happen.
fn inbound_strategy() -> impl Strategy<Value = InboundEvent> {
    prop_oneof![
        1 => user().prop_map(|u| InboundEvent::UserOnline(PresenceChange { username: u.into() })),
        1 => user().prop_map(|u| InboundEvent::UserOffline(PresenceChange { username: u.into() })),
        2 => (1u64..4, user()).prop_map(|(id, u)| InboundEvent::PrivateHistory(PrivateHistory {
            chat_id: id.into(),
            peer_name: u.into(),
            messages: vec![Message::new(u, "earlier", "09:00")],
        })),
        1 => (1u64..4).prop_map(|id| InboundEvent::GroupHistory(GroupHistory {
            group_id: id.into(),
            peer_name: "ops".into(),
            messages: vec![],
        })),
        2 => (1u64..4, user()).prop_map(|(id, u)| InboundEvent::NewPrivateMessage(PrivateMessage {
            chat_id: id.into(),
            message: Message::new(u, "live", "10:00"),
        })),
        1 => (1u64..4, user()).prop_map(|(id, u)| InboundEvent::NewGroupMessage(GroupMessage {
            group_id: id.into(),
            message: Message::new(u, "live", "10:00"),
        })),
        2 => (prop::option::of(kind()), 1u64..4, user()).prop_map(|(k, id, u)| {
            InboundEvent::UserTyping(TypingNotice { chat_type: k, chat_id: id.into(), username: u.into() })
        }),
        1 => (prop::option::of(kind()), 1u64..4, prop::option::of(user())).prop_map(|(k, id, u)| {
            InboundEvent::UserStopTyping(TypingStopped {
                chat_type: k,
                chat_id: id.into(),
                username: u.map(Into::into),
            })
        }),
    ]
}

#[derive(Debug, Clone)]
enum Step {
    Event(SessionEvent),
    Advance(u64),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => intent_strategy().prop_map(|i| Step::Event(i.into())),
        3 => inbound_strategy().prop_map(|e| Step::Event(e.into())),
        2 => (0u64..1500).prop_map(Step::Advance),
    ]
}

fn controller() -> SessionController<Duration> {
    SessionController::new(SessionConfig::new("me").with_contacts(["bob", "carol"]))
}

fn count(actions: &[SessionAction], name: &str) -> usize {
    actions
        .iter()
        .filter(|a| matches!(a, SessionAction::Emit(event) if event.name() == name))
        .count()
}

/// Open a group and deliver its history.
fn activate_group(controller: &mut SessionController<Duration>, id: u64) {
    let _ = controller.join_group(id.into(), Some("ops".into()));
    let _ = controller.handle_inbound(InboundEvent::GroupHistory(GroupHistory {
        group_id: id.into(),
        peer_name: "ops".into(),
        messages: vec![],
    }));
}

proptest! {
    #[test]
    fn prop_invariants_hold(steps in prop::collection::vec(step_strategy(), 0..80)) {
        let mut controller = controller();
        let invariants = InvariantRegistry::standard();
        let mut now = Duration::ZERO;

        for (i, step) in steps.into_iter().enumerate() {
            match step {
                Step::Event(event) => {
                    let _ = controller.handle(event, now);
                },
                Step::Advance(ms) => {
                    now += Duration::from_millis(ms);
                    let _ = controller.tick(now);
                },
            }
            let snapshot = SessionSnapshot::from_controller(&controller);
            invariants.assert_all(&snapshot, &format!("at step {i}"));
        }
    }

    #[test]
    fn prop_typing_start_and_stop_alternate(steps in prop::collection::vec(step_strategy(), 0..80)) {
        let mut controller = controller();
        let mut now = Duration::ZERO;
        let mut typing = false;

        for step in steps {
            let actions = match step {
                Step::Event(event) => controller.handle(event, now),
                Step::Advance(ms) => {
                    now += Duration::from_millis(ms);
                    controller.tick(now)
                },
            };
            for action in &actions {
                match action {
                    SessionAction::Emit(OutboundEvent::TypingStart(_)) => {
                        prop_assert!(!typing, "typing_start while already typing");
                        typing = true;
                    },
                    SessionAction::Emit(OutboundEvent::TypingStop(_)) => {
                        prop_assert!(typing, "typing_stop without typing_start");
                        typing = false;
                    },
                    _ => {},
                }
            }
        }
    }

    #[test]
    fn prop_burst_emits_single_start(gaps in prop::collection::vec(0u64..1000, 1..30)) {
        let mut controller = controller();
        activate_group(&mut controller, 1);

        let mut now = Duration::ZERO;
        let mut actions = controller.input(now);
        for gap in gaps {
            now += Duration::from_millis(gap);
            actions.extend(controller.tick(now));
            actions.extend(controller.input(now));
        }

        prop_assert_eq!(count(&actions, "typing_start"), 1);
        prop_assert_eq!(count(&actions, "typing_stop"), 0);
    }

    #[test]
    fn prop_gap_closes_burst(gap in 1000u64..10_000, ticked in any::<bool>()) {
        let mut controller = controller();
        activate_group(&mut controller, 1);

        let mut actions = controller.input(Duration::ZERO);
        let later = Duration::from_millis(gap);
        if ticked {
            actions.extend(controller.tick(later));
        }
        actions.extend(controller.input(later));

        prop_assert_eq!(count(&actions, "typing_start"), 2);
        prop_assert_eq!(count(&actions, "typing_stop"), 1);
    }

    #[test]
    fn prop_switch_while_typing_stops_once(
        keystrokes in 1usize..10,
        switch_at in 0u64..999,
        group in any::<bool>()
    ) {
        let mut controller = controller();
        activate_group(&mut controller, 1);

        let mut actions = Vec::new();
        for _ in 0..keystrokes {
            actions.extend(controller.input(Duration::ZERO));
        }

        let switched = Duration::from_millis(switch_at);
        actions.extend(if group {
            controller.join_group(2.into(), None)
        } else {
            controller.open_private_chat("bob".into())
        });
        actions.extend(controller.tick(switched + Duration::from_secs(10)));

        prop_assert_eq!(count(&actions, "typing_stop"), 1);
    }

    #[test]
    fn prop_stale_history_is_discarded(first in 1u64..100, second in 100u64..200) {
        let mut controller = controller();
        let _ = controller.join_group(first.into(), None);
        let _ = controller.join_group(second.into(), None);

        let stale = controller.handle_inbound(InboundEvent::GroupHistory(GroupHistory {
            group_id: first.into(),
            peer_name: "first".into(),
            messages: vec![Message::new("bob", "stale", "")],
        }));
        prop_assert!(stale.is_empty());
        prop_assert!(controller.active().is_none());

        let _ = controller.handle_inbound(InboundEvent::GroupHistory(GroupHistory {
            group_id: second.into(),
            peer_name: "second".into(),
            messages: vec![],
        }));
        let active = controller.active().map(|c| c.id.clone());
        prop_assert_eq!(active, Some(second.into()));
        prop_assert!(controller.messages().is_empty());
    }

    #[test]
    fn prop_repeated_online_is_idempotent(name in user(), repeats in 1usize..5) {
        let mut controller = controller();
        let _ = controller.handle_inbound(InboundEvent::UserOnline(PresenceChange { username: name.into() }));
        let after_first = controller.online().clone();

        for _ in 0..repeats {
            let _ = controller.handle_inbound(InboundEvent::UserOnline(PresenceChange { username: name.into() }));
        }
        prop_assert_eq!(controller.online(), &after_first);
    }
}
