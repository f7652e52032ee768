//! Application layer for Parley
//!
//! Wires the session state machines into one controller and drives it from a
//! platform driver. The same orchestration code runs in the replay binary and
//! in simulation tests.
//!
//! # Components
//!
//! - [`SessionController`]: routes user intents and channel events to the
//!   conversation, typing, and presence components
//! - [`Driver`]: trait for the event channel and render sink
//! - [`Runtime`]: generic event loop over a `Driver` and an `Environment`

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod controller;
mod driver;
mod event;
mod runtime;

pub use controller::SessionController;
pub use driver::Driver;
pub use event::{Intent, SessionEvent};
pub use parley_core::{RenderOp, SessionAction, SessionConfig};
pub use runtime::Runtime;
