//! Deterministic simulation harness for Parley session testing.
//!
//! [`SimDriver`] feeds a scripted event sequence to the real
//! [`parley_app::Runtime`] on tokio time. Under a paused clock every typing
//! deadline and every interleaving of user intents with server events is
//! reproducible.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all event orderings,
//! not specific scenarios. Use [`InvariantRegistry::standard()`] for the
//! session invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_driver;

pub use invariants::{
    DeadlineMatchesTyping, Invariant, InvariantRegistry, InvariantResult, MessagesOnlyWhenActive,
    RemoteTyperNotSelf, SessionSnapshot, TypingScopedToActive, Violation,
};
pub use sim_driver::{SimDriver, SimDriverError};
