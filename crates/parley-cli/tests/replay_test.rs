//! Replays a scripted session through the real runtime and checks the JSON
//! lines it writes.

use parley_cli::{ReplayDriver, Runtime, SessionConfig};
use parley_core::env::SystemEnv;

async fn replay(script: &'static str) -> String {
    let driver = ReplayDriver::new(script.as_bytes(), Vec::new());
    let mut runtime = Runtime::new(driver, SystemEnv, SessionConfig::new("alice"));
    runtime.run().await.unwrap();

    String::from_utf8(runtime.into_driver().into_output()).unwrap()
}

#[tokio::test(start_paused = true)]
async fn replay_writes_emits_and_renders() {
    let script = r#"
# alice opens the chat with bob
{"intent":"open_private","username":"bob"}
{"event":"private_history","payload":{"chat_id":7,"other_user":"bob","messages":[{"username":"bob","text":"hi","timestamp":"10:00"}]}}
{"intent":"input"}
{"delay_ms":1500}
{"event":"user_online","payload":{"username":"bob"}}
{"event":"bogus","payload":{}}
"#;

    let out = replay(script).await;

    insta::assert_snapshot!(out.trim_end(), @r#"
    {"render":{"op":"typing_indicator","username":null}}
    {"emit":{"event":"request_private_history","payload":{"other_user":"bob"}}}
    {"render":{"op":"loading","target":"bob"}}
    {"render":{"op":"clear_messages"}}
    {"render":{"op":"title","kind":"private","name":"bob"}}
    {"render":{"op":"active_peer","username":"bob"}}
    {"render":{"op":"message","author":"bob","text":"hi","timestamp":"10:00","own":false}}
    {"render":{"op":"input","enabled":true,"placeholder":"Message bob..."}}
    {"render":{"op":"scroll_to_bottom"}}
    {"emit":{"event":"typing_start","payload":{"chat_type":"private","chat_id":7}}}
    {"emit":{"event":"typing_stop","payload":{"chat_type":"private","chat_id":7}}}
    {"render":{"op":"user_status","username":"bob","online":true}}
    {"render":{"op":"online_count","count":1}}
    {"render":{"op":"notice","text":"bob is online"}}
    "#);
}

#[tokio::test(start_paused = true)]
async fn send_without_chat_is_alerted_not_emitted() {
    let out = replay("{\"intent\":\"send\",\"text\":\"hello?\"}\n").await;

    assert!(!out.contains("\"emit\""));
    assert!(out.contains("Select a chat before sending a message."));
}
