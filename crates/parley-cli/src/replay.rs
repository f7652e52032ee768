//! Replay driver.
//!
//! Implements the [`Driver`] trait over a line-oriented script. Each input
//! line is one of:
//!
//! - `{"delay_ms": 500}`: wait before reading the next line
//! - `{"intent": "open_private", "username": "bob"}`: a user intent
//! - `{"event": "private_history", "payload": {...}}`: a server event
//!
//! Blank lines and lines starting with `#` are skipped. Each emitted event
//! and render operation is written as one JSON line: `{"emit": {...}}` or
//! `{"render": {...}}`.

use std::{
    io::{self, Write},
    time::Duration,
};

use parley_app::{Driver, Intent, RenderOp, SessionEvent};
use parley_proto::{Envelope, OutboundEvent};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, Lines},
    time::Instant,
};

/// Replay driver errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Reading the script or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An output line could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One line of the input script.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScriptLine {
    Delay { delay_ms: u64 },
    Intent(Intent),
    Channel(Envelope),
}

/// One line of output.
#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum OutputLine<'a> {
    Emit(&'a OutboundEvent),
    Render(&'a RenderOp),
}

/// Driver reading a script from `R` and writing JSON lines to `W`.
pub struct ReplayDriver<R, W> {
    lines: Lines<R>,
    out: W,
    /// End of a pending delay. Kept across cancelled polls.
    resume_at: Option<Instant>,
    line_no: usize,
}

impl<R, W> ReplayDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    /// Create a driver over a script reader and an output sink.
    pub fn new(script: R, out: W) -> Self {
        Self { lines: script.lines(), out, resume_at: None, line_no: 0 }
    }

    /// Consume the driver, returning the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &OutputLine<'_>) -> Result<(), ReplayError> {
        serde_json::to_writer(&mut self.out, line)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    /// Interpret one script line. `None` for lines that produce no event.
    fn parse(&mut self, line: &str) -> Option<SessionEvent> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        match serde_json::from_str::<ScriptLine>(line) {
            Ok(ScriptLine::Delay { delay_ms }) => {
                self.resume_at = Some(Instant::now() + Duration::from_millis(delay_ms));
                None
            },
            Ok(ScriptLine::Intent(intent)) => Some(intent.into()),
            Ok(ScriptLine::Channel(envelope)) => match envelope.into_inbound() {
                Ok(event) => Some(event.into()),
                Err(error) => {
                    tracing::warn!(line = self.line_no, %error, "dropping inbound event");
                    None
                },
            },
            Err(error) => {
                tracing::warn!(line = self.line_no, %error, "skipping unrecognised script line");
                None
            },
        }
    }
}

impl<R, W> Driver for ReplayDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    type Error = ReplayError;

    async fn poll_event(&mut self) -> Result<Option<SessionEvent>, Self::Error> {
        loop {
            if let Some(deadline) = self.resume_at {
                tokio::time::sleep_until(deadline).await;
                self.resume_at = None;
            }

            let Some(line) = self.lines.next_line().await? else {
                return Ok(None);
            };
            self.line_no += 1;

            if let Some(event) = self.parse(&line) {
                return Ok(Some(event));
            }
        }
    }

    async fn emit(&mut self, event: OutboundEvent) -> Result<(), Self::Error> {
        self.write_line(&OutputLine::Emit(&event))?;
        self.out.flush()?;
        Ok(())
    }

    fn render(&mut self, op: RenderOp) -> Result<(), Self::Error> {
        self.write_line(&OutputLine::Render(&op))
    }

    fn stop(&mut self) {
        if let Err(error) = self.out.flush() {
            tracing::warn!(%error, "failed to flush output");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> ReplayDriver<&'static [u8], Vec<u8>> {
        ReplayDriver::new(&b""[..], Vec::new())
    }

    #[test]
    fn script_lines_are_recognised() {
        let mut driver = driver();

        assert!(driver.parse("").is_none());
        assert!(driver.parse("# comment").is_none());
        assert!(driver.parse("not json").is_none());
        assert!(driver.parse(r#"{"event":"no_such_event","payload":{}}"#).is_none());

        assert_eq!(driver.parse(r#"{"intent":"blur"}"#), Some(SessionEvent::Intent(Intent::Blur)));
        assert!(matches!(
            driver.parse(r#"{"event":"user_online","payload":{"username":"bob"}}"#),
            Some(SessionEvent::Inbound(_))
        ));
    }

    #[test]
    fn delay_line_sets_resume_point() {
        let mut driver = driver();
        assert!(driver.parse(r#"{"delay_ms":250}"#).is_none());
        assert!(driver.resume_at.is_some());
    }

    #[test]
    fn output_lines_are_externally_tagged() {
        let mut driver = driver();
        driver.render(RenderOp::ScrollToBottom).unwrap();

        let out = String::from_utf8(driver.into_output()).unwrap();
        assert_eq!(out, "{\"render\":{\"op\":\"scroll_to_bottom\"}}\n");
    }
}
