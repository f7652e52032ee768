//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` plays a script of events at fixed offsets on tokio time and
//! records everything the runtime emits or renders. It implements [`Driver`]
//! so the same [`parley_app::Runtime`] orchestration code runs in both the
//! replay binary and simulation. Run it under a paused tokio clock and the
//! whole session is deterministic.

use std::{collections::VecDeque, time::Duration};

use parley_app::{Driver, RenderOp, SessionEvent};
use parley_proto::OutboundEvent;
use serde::Serialize;
use tokio::time::Instant;

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// Simulation driver for deterministic testing.
pub struct SimDriver {
    start: Instant,
    /// Pending steps, ordered by offset from `start`.
    script: VecDeque<(Duration, SessionEvent)>,
    emitted: Vec<(Duration, OutboundEvent)>,
    rendered: Vec<RenderOp>,
    transcript: Vec<String>,
    stopped: bool,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Create a driver with an empty script. Offsets count from now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            script: VecDeque::new(),
            emitted: Vec::new(),
            rendered: Vec::new(),
            transcript: Vec::new(),
            stopped: false,
        }
    }

    /// Add a step delivered `at` after start.
    #[must_use]
    pub fn with_step(mut self, at: Duration, event: impl Into<SessionEvent>) -> Self {
        self.push(at, event);
        self
    }

    /// Add a step delivered `at` after start.
    ///
    /// Steps are kept sorted by offset; steps with equal offsets keep their
    /// insertion order.
    pub fn push(&mut self, at: Duration, event: impl Into<SessionEvent>) {
        let index = self.script.partition_point(|(offset, _)| *offset <= at);
        self.script.insert(index, (at, event.into()));
    }

    /// Number of steps not yet delivered.
    pub fn pending(&self) -> usize {
        self.script.len()
    }

    /// Emitted events with the offset they were emitted at.
    pub fn emitted(&self) -> &[(Duration, OutboundEvent)] {
        &self.emitted
    }

    /// Names of emitted events, in order.
    pub fn emitted_names(&self) -> Vec<&'static str> {
        self.emitted.iter().map(|(_, event)| event.name()).collect()
    }

    /// Render operations, in order.
    pub fn rendered(&self) -> &[RenderOp] {
        &self.rendered
    }

    /// One line per recorded action: offset, kind, JSON body.
    pub fn transcript(&self) -> String {
        self.transcript.join("\n")
    }

    /// Whether the runtime stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn elapsed(&self) -> Duration {
        Instant::now().saturating_duration_since(self.start)
    }

    fn record(&mut self, kind: &str, body: &impl Serialize) {
        let json = match serde_json::to_string(body) {
            Ok(json) => json,
            Err(e) => format!("<unserializable: {e}>"),
        };
        let line = format!("[{:>5}ms] {kind} {json}", self.elapsed().as_millis());
        self.transcript.push(line);
    }

    fn ensure_running(&self) -> Result<(), SimDriverError> {
        if self.stopped { Err(SimDriverError("driver stopped".into())) } else { Ok(()) }
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    /// Cancel-safe: the step is only removed from the script after its sleep
    /// completes.
    async fn poll_event(&mut self) -> Result<Option<SessionEvent>, Self::Error> {
        self.ensure_running()?;

        let Some((at, _)) = self.script.front() else {
            return Ok(None);
        };
        tokio::time::sleep_until(self.start + *at).await;

        Ok(self.script.pop_front().map(|(_, event)| event))
    }

    async fn emit(&mut self, event: OutboundEvent) -> Result<(), Self::Error> {
        self.ensure_running()?;
        self.record("emit", &event);
        self.emitted.push((self.elapsed(), event));
        Ok(())
    }

    fn render(&mut self, op: RenderOp) -> Result<(), Self::Error> {
        self.ensure_running()?;
        self.record("render", &op);
        self.rendered.push(op);
        Ok(())
    }

    fn stop(&mut self) {
        tracing::debug!(pending = self.script.len(), "simulation driver stopped");
        self.stopped = true;
    }
}

#[cfg(test)]
mod tests {
    use parley_app::Intent;

    use super::*;

    #[test]
    fn steps_are_ordered_by_offset() {
        let driver = SimDriver::new()
            .with_step(Duration::from_millis(20), Intent::Blur)
            .with_step(Duration::from_millis(10), Intent::Input)
            .with_step(Duration::from_millis(20), Intent::Close);

        let order: Vec<_> = driver.script.iter().map(|(at, e)| (at.as_millis(), e.clone())).collect();
        assert_eq!(order, vec![
            (10, SessionEvent::Intent(Intent::Input)),
            (20, SessionEvent::Intent(Intent::Blur)),
            (20, SessionEvent::Intent(Intent::Close)),
        ]);
    }

    #[test]
    fn stopped_driver_rejects_renders() {
        let mut driver = SimDriver::new();
        driver.stop();
        assert!(driver.render(RenderOp::ClearInput).is_err());
    }
}
