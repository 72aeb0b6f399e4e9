//! Bootstrap state machine.
//!
//! ```text
//! Idle ──► Indexing ──► Binding ──► Serving
//!            │            │
//!            └──► Failed ◄┘
//! ```
//!
//! `Binding` is only reachable from `Indexing`, and a server only stays in
//! `Indexing` once its index has been written; a failed build or write moves
//! it to `Failed`. Binding before the index exists is a rejected transition.

use std::fmt;

use super::{ServeError, ServeResult};

/// Lifecycle phase of a repository server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    /// Created, nothing done yet
    Idle,
    /// Path validated, index being built and written
    Indexing,
    /// Index written, listener being bound
    Binding,
    /// Listener bound and accepting connections
    Serving,
    /// A bootstrap step failed; terminal
    Failed,
}

impl BootstrapState {
    /// Returns true if `next` is a legal successor of this state.
    pub fn can_transition_to(self, next: BootstrapState) -> bool {
        use BootstrapState::*;
        matches!(
            (self, next),
            (Idle, Indexing)
                | (Indexing, Binding)
                | (Binding, Serving)
                | (Idle, Failed)
                | (Indexing, Failed)
                | (Binding, Failed)
        )
    }

    /// Returns true for states with no successors.
    pub fn is_terminal(self) -> bool {
        matches!(self, BootstrapState::Serving | BootstrapState::Failed)
    }
}

impl fmt::Display for BootstrapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootstrapState::Idle => "idle",
            BootstrapState::Indexing => "indexing",
            BootstrapState::Binding => "binding",
            BootstrapState::Serving => "serving",
            BootstrapState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Tracks the current state and rejects out-of-order steps.
#[derive(Debug)]
pub struct Bootstrap {
    state: BootstrapState,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::new()
    }
}

impl Bootstrap {
    pub fn new() -> Self {
        Self {
            state: BootstrapState::Idle,
        }
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    /// Move to `next`, or fail without changing state.
    pub fn advance(&mut self, next: BootstrapState) -> ServeResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(ServeError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!(from = %self.state, to = %next, "bootstrap transition");
        self.state = next;
        Ok(())
    }

    /// Record a failure. Has no effect once serving or already failed.
    pub fn fail(&mut self) {
        if self.state.can_transition_to(BootstrapState::Failed) {
            self.state = BootstrapState::Failed;
        }
    }

    /// Pass a step's result through, recording a failure if it errored.
    pub fn guard<T>(&mut self, step: ServeResult<T>) -> ServeResult<T> {
        if step.is_err() {
            self.fail();
        }
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut bootstrap = Bootstrap::new();
        bootstrap.advance(BootstrapState::Indexing).unwrap();
        bootstrap.advance(BootstrapState::Binding).unwrap();
        bootstrap.advance(BootstrapState::Serving).unwrap();
        assert_eq!(bootstrap.state(), BootstrapState::Serving);
        assert!(bootstrap.state().is_terminal());
    }

    #[test]
    fn test_cannot_bind_before_indexing() {
        let mut bootstrap = Bootstrap::new();
        let err = bootstrap.advance(BootstrapState::Binding).unwrap_err();
        assert!(matches!(
            err,
            ServeError::InvalidTransition {
                from: BootstrapState::Idle,
                to: BootstrapState::Binding
            }
        ));
        assert_eq!(bootstrap.state(), BootstrapState::Idle);
    }

    #[test]
    fn test_cannot_serve_before_binding() {
        let mut bootstrap = Bootstrap::new();
        bootstrap.advance(BootstrapState::Indexing).unwrap();
        assert!(bootstrap.advance(BootstrapState::Serving).is_err());
    }

    #[test]
    fn test_failed_is_terminal() {
        let mut bootstrap = Bootstrap::new();
        bootstrap.advance(BootstrapState::Indexing).unwrap();
        bootstrap.fail();
        assert_eq!(bootstrap.state(), BootstrapState::Failed);
        assert!(bootstrap.advance(BootstrapState::Binding).is_err());
        assert!(bootstrap.advance(BootstrapState::Indexing).is_err());
    }

    #[test]
    fn test_fail_after_serving_is_ignored() {
        let mut bootstrap = Bootstrap::new();
        bootstrap.advance(BootstrapState::Indexing).unwrap();
        bootstrap.advance(BootstrapState::Binding).unwrap();
        bootstrap.advance(BootstrapState::Serving).unwrap();
        bootstrap.fail();
        assert_eq!(bootstrap.state(), BootstrapState::Serving);
    }

    #[test]
    fn test_guard_marks_failure() {
        let mut bootstrap = Bootstrap::new();
        bootstrap.advance(BootstrapState::Indexing).unwrap();
        let result: ServeResult<()> =
            bootstrap.guard(Err(ServeError::NotFound("/nope".into())));
        assert!(result.is_err());
        assert_eq!(bootstrap.state(), BootstrapState::Failed);
    }

    #[test]
    fn test_display() {
        assert_eq!(BootstrapState::Indexing.to_string(), "indexing");
        assert_eq!(BootstrapState::Failed.to_string(), "failed");
    }
}
