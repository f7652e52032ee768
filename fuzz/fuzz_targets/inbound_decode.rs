//! Fuzz target for inbound event decoding
//!
//! Feeds arbitrary lines to `Envelope::parse` and arbitrary JSON payloads to
//! `InboundEvent::decode` under every known event name, covering:
//! - Invalid JSON and non-object envelopes
//! - Ids of the wrong type (floats, booleans, nested objects)
//! - History arrays mixing objects with scalars
//! - Unknown event names
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use parley_proto::{Envelope, InboundEvent};

const NAMES: [&str; 10] = [
    "user_online",
    "user_offline",
    "online_users_snapshot",
    "private_history",
    "group_history",
    "new_private_message",
    "new_group_message",
    "user_typing",
    "user_stop_typing",
    "not_an_event",
];

fuzz_target!(|data: &[u8]| {
    let line = String::from_utf8_lossy(data);

    if let Ok(envelope) = Envelope::parse(&line) {
        if let Ok(event) = envelope.into_inbound() {
            // Decoded events must re-encode and name a known event
            let _ = event.conversation();
            assert!(NAMES.contains(&event.name()));
            let _ = serde_json::to_value(&event);
        }
    }

    if let Ok(payload) = serde_json::from_str::<serde_json::Value>(&line) {
        for name in NAMES {
            let _ = InboundEvent::decode(name, payload.clone());
        }
    }
});
