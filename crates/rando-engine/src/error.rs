//! Error types for the engine binary.

/// Top-level error for the engine binary.
///
/// Wraps every subsystem error so `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: rando_core::ConfigError,
    },

    /// The run could not be started or a collect failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: rando_core::SessionError,
    },

    /// An FSM event could not be delivered.
    #[error("fsm error: {source}")]
    Fsm {
        /// The underlying FSM error.
        #[from]
        source: rando_fsm::FsmError,
    },

    /// The run report could not be serialized.
    #[error("report error: {source}")]
    Report {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
