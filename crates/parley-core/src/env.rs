//! Time abstraction for deterministic testing.
//!
//! The state machines never read a clock; callers pass the current instant
//! in. Runtimes obtain it from an [`Environment`], which production backs
//! with `tokio::time` and simulation backs with a virtual clock.

use std::{
    fmt::Debug,
    future::Future,
    ops::{Add, Sub},
    time::Duration,
};

/// Bounds an instant type must satisfy to drive the typing timer.
pub trait MonotonicInstant:
    Copy + Ord + Send + Sync + Debug + Add<Duration, Output = Self> + Sub<Output = Duration>
{
}

impl<T> MonotonicInstant for T where
    T: Copy + Ord + Send + Sync + Debug + Add<Duration, Output = Self> + Sub<Output = Duration>
{
}

/// Abstract environment providing time.
///
/// # Invariants
///
/// - `now()` never goes backwards within one environment.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Instant type. Real time in production, virtual time in simulation.
    type Instant: MonotonicInstant;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Sleep until `deadline`. Returns immediately if it has passed.
    ///
    /// Only runtimes call this; state machines stay synchronous.
    fn sleep_until(&self, deadline: Self::Instant) -> impl Future<Output = ()> + Send;
}

/// Production environment on the tokio clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl Environment for SystemEnv {
    type Instant = tokio::time::Instant;

    fn now(&self) -> Self::Instant {
        tokio::time::Instant::now()
    }

    fn sleep_until(&self, deadline: Self::Instant) -> impl Future<Output = ()> + Send {
        tokio::time::sleep_until(deadline)
    }
}
