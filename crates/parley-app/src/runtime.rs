//! Generic runtime for session orchestration.
//!
//! The Runtime drives the session event loop, coordinating between:
//! - [`SessionController`]: session state machine
//! - [`Driver`]: event channel and render sink
//! - [`Environment`]: clock for the typing idle deadline

use parley_core::{SessionAction, SessionConfig, env::Environment};

use crate::{Driver, SessionController, SessionEvent};

/// Why the event loop woke up.
enum Wake {
    /// The typing idle deadline passed.
    Deadline,
    /// The driver produced an event, or `None` at end of input.
    Event(Option<SessionEvent>),
}

/// Generic runtime that orchestrates the controller and a driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment supplying time
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    env: E,
    controller: SessionController<E::Instant>,
}

impl<D, E> Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    /// Create a new runtime with the given driver and environment.
    pub fn new(driver: D, env: E, config: SessionConfig) -> Self {
        Self { driver, env, controller: SessionController::new(config) }
    }

    /// Run the event loop until the driver reports end of input.
    ///
    /// Each cycle waits for whichever comes first: the next driver event or
    /// the typing idle deadline. A deadline that is due wins over an event
    /// that is ready at the same instant, so `typing_stop` is never delayed
    /// by a busy channel. On end of input any pending `typing_stop` is
    /// flushed before the driver is stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to poll, emit, or render.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        loop {
            let wake = match self.controller.next_deadline() {
                Some(deadline) => tokio::select! {
                    biased;
                    () = self.env.sleep_until(deadline) => Wake::Deadline,
                    event = self.driver.poll_event() => Wake::Event(event?),
                },
                None => Wake::Event(self.driver.poll_event().await?),
            };

            let actions = match wake {
                Wake::Deadline => self.controller.tick(self.env.now()),
                Wake::Event(Some(event)) => self.controller.handle(event, self.env.now()),
                Wake::Event(None) => break,
            };
            self.execute(actions).await?;
        }

        tracing::debug!("input finished, shutting down");
        let actions = self.controller.blur();
        self.execute(actions).await?;
        self.driver.stop();
        Ok(())
    }

    /// Execute controller actions in order.
    async fn execute(&mut self, actions: Vec<SessionAction>) -> Result<(), D::Error> {
        for action in actions {
            match action {
                SessionAction::Emit(event) => {
                    tracing::debug!(event = event.name(), "emit");
                    self.driver.emit(event).await?;
                },
                SessionAction::Render(op) => self.driver.render(op)?,
            }
        }
        Ok(())
    }

    /// Get a reference to the controller.
    pub fn controller(&self) -> &SessionController<E::Instant> {
        &self.controller
    }

    /// Get a reference to the driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Consume the runtime, returning the driver.
    pub fn into_driver(self) -> D {
        self.driver
    }
}
