//! Replay shell for Parley
//!
//! A thin shell over [`parley_app::Driver`] that reads a JSON-lines script
//! and writes emitted events and render operations as JSON lines. All
//! orchestration logic lives in the generic [`parley_app::Runtime`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod replay;

pub use parley_app::{Driver, Runtime, SessionConfig};
pub use replay::{ReplayDriver, ReplayError};
