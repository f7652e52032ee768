//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the runtime from the concrete event channel
//! and view. Each frontend implements it, while the generic
//! [`crate::Runtime`] handles all orchestration.

use std::future::Future;

use parley_core::RenderOp;
use parley_proto::OutboundEvent;

use crate::SessionEvent;

/// Event channel plus render sink.
///
/// # Implementations
///
/// - **Replay**: JSON lines on stdin/stdout (`parley-replay`)
/// - **Simulation**: scripted events on tokio's paused clock
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next user intent or channel event.
    ///
    /// Returns `None` once the channel is finished. Must be cancel-safe: the
    /// runtime drops this future when the typing deadline fires first, and
    /// the event must still be delivered by the next call.
    fn poll_event(
        &mut self,
    ) -> impl Future<Output = Result<Option<SessionEvent>, Self::Error>> + Send;

    /// Send an event on the channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is closed or the write fails.
    fn emit(&mut self, event: OutboundEvent) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Apply a render operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the view can no longer be updated.
    fn render(&mut self, op: RenderOp) -> Result<(), Self::Error>;

    /// Release channel resources.
    fn stop(&mut self);
}
