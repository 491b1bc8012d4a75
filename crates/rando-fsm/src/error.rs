//! Error types for the `rando-fsm` crate.

/// Errors raised by structural FSM edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FsmError {
    /// A state was looked up by a name the FSM does not contain.
    #[error("state not found: {0}")]
    NotFound(String),

    /// A state was added under a name that already exists.
    #[error("duplicate state: {0}")]
    DuplicateState(String),

    /// A transition points at a state that does not exist.
    #[error("transition {state} --{event}--> {target} has no target state")]
    DanglingTransition {
        /// Source state.
        state: String,
        /// Triggering event.
        event: String,
        /// Missing target.
        target: String,
    },
}
