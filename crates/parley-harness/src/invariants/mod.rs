//! Invariant checking for deterministic simulation testing.
//!
//! Invariants are properties that must always hold during a session. Unlike
//! example-based tests that check specific scenarios, invariants verify
//! behavioral properties across all possible event orderings.
//!
//! # Architecture
//!
//! Observable state is extracted from a `SessionController` into a
//! [`SessionSnapshot`], then every registered [`Invariant`] is checked
//! against it.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = SessionSnapshot::from_controller(&controller);
//! registry.check_all(&snapshot)?;
//! ```

mod checks;
mod snapshot;

pub use checks::{
    DeadlineMatchesTyping, MessagesOnlyWhenActive, RemoteTyperNotSelf, TypingScopedToActive,
};
pub use snapshot::SessionSnapshot;

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Invariant violation with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// An invariant that can be checked against session state.
pub trait Invariant: Send + Sync {
    /// Invariant name for error reporting.
    fn name(&self) -> &'static str;

    /// Check the invariant against a snapshot.
    ///
    /// Returns `Ok(())` if the invariant holds, or a [`Violation`]
    /// describing what went wrong.
    fn check(&self, state: &SessionSnapshot) -> InvariantResult;
}

/// Registry of invariants to check.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Create a registry with the standard session invariants.
    ///
    /// Includes:
    /// - [`RemoteTyperNotSelf`]: the local user never shows as typing
    /// - [`TypingScopedToActive`]: typing state implies an active conversation
    /// - [`MessagesOnlyWhenActive`]: no messages held unless active
    /// - [`DeadlineMatchesTyping`]: idle timer armed iff self-typing
    pub fn standard() -> Self {
        Self {
            invariants: vec![
                Box::new(RemoteTyperNotSelf),
                Box::new(TypingScopedToActive),
                Box::new(MessagesOnlyWhenActive),
                Box::new(DeadlineMatchesTyping),
            ],
        }
    }

    /// Register an additional invariant.
    #[must_use]
    pub fn with<I: Invariant + 'static>(mut self, invariant: I) -> Self {
        self.invariants.push(Box::new(invariant));
        self
    }

    /// Check all invariants against the given state.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(&self, state: &SessionSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Check all invariants, panicking with every violation.
    ///
    /// Use this in tests where you want immediate failure with context.
    #[allow(clippy::panic, reason = "test helper; the panic fails the calling test")]
    pub fn assert_all(&self, state: &SessionSnapshot, context: &str) {
        if let Err(violations) = self.check_all(state) {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("Invariant violation {context}:\n  {}", messages.join("\n  "));
        }
    }
}
