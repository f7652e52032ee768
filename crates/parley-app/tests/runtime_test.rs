//! Runtime loop tests against an in-memory driver.

use std::{collections::VecDeque, time::Duration};

use parley_app::{Driver, Intent, RenderOp, Runtime, SessionConfig, SessionEvent};
use parley_core::env::SystemEnv;
use parley_proto::OutboundEvent;

#[derive(Debug)]
struct SinkClosed;

impl std::fmt::Display for SinkClosed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("render sink closed")
    }
}

impl std::error::Error for SinkClosed {}

/// Delivers queued events immediately; fails renders once `render_budget`
/// is spent.
#[derive(Default)]
struct QueueDriver {
    events: VecDeque<SessionEvent>,
    emitted: Vec<OutboundEvent>,
    renders: usize,
    render_budget: Option<usize>,
    stopped: bool,
}

impl QueueDriver {
    fn new(events: impl IntoIterator<Item = SessionEvent>) -> Self {
        Self { events: events.into_iter().collect(), ..Self::default() }
    }
}

impl Driver for QueueDriver {
    type Error = SinkClosed;

    async fn poll_event(&mut self) -> Result<Option<SessionEvent>, Self::Error> {
        Ok(self.events.pop_front())
    }

    async fn emit(&mut self, event: OutboundEvent) -> Result<(), Self::Error> {
        self.emitted.push(event);
        Ok(())
    }

    fn render(&mut self, _op: RenderOp) -> Result<(), Self::Error> {
        if self.render_budget.is_some_and(|budget| self.renders >= budget) {
            return Err(SinkClosed);
        }
        self.renders += 1;
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

fn config() -> SessionConfig {
    SessionConfig::new("alice").with_typing_idle(Duration::from_millis(250))
}

#[tokio::test(start_paused = true)]
async fn rejections_do_not_end_the_loop() {
    let driver = QueueDriver::new([
        Intent::Send { text: "nobody listening".into() }.into(),
        Intent::OpenPrivate { username: "alice".into() }.into(),
        Intent::OpenPrivate { username: "bob".into() }.into(),
    ]);

    let mut runtime = Runtime::new(driver, SystemEnv, config());
    runtime.run().await.unwrap();

    let driver = runtime.into_driver();
    assert_eq!(driver.emitted.len(), 1);
    assert!(matches!(driver.emitted[0], OutboundEvent::RequestPrivateHistory(_)));
    assert!(driver.stopped);
}

#[tokio::test(start_paused = true)]
async fn driver_errors_end_the_loop() {
    let mut driver = QueueDriver::new([
        Intent::OpenPrivate { username: "bob".into() }.into(),
        Intent::JoinGroup { group_id: 1.into(), name: None }.into(),
    ]);
    driver.render_budget = Some(1);

    let mut runtime = Runtime::new(driver, SystemEnv, config());
    assert!(runtime.run().await.is_err());
    assert!(!runtime.driver().stopped);
    assert!(runtime.controller().active().is_none());
}
