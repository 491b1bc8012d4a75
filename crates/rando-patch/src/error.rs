//! Error types for the `rando-patch` crate.
//!
//! None of these escape the dispatcher: a failing rule is logged and skipped
//! for that object while every other rule still runs.

use rando_fsm::FsmError;
use rando_types::{ObjectName, SceneName};

/// Errors that can occur while applying a patch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    /// The FSM does not have the states or transitions the patch expects.
    #[error("graph shape mismatch: {0}")]
    GraphShapeMismatch(#[from] FsmError),

    /// A state exists but lacks a transition or action the patch edits.
    #[error("state {state} has no {element}")]
    MissingElement {
        /// State that was inspected.
        state: String,
        /// What was expected in it.
        element: &'static str,
    },

    /// A scene object the patch depends on is absent.
    #[error("object {object} not found in scene {scene}")]
    MissingExternalObject {
        /// Scene that was searched.
        scene: SceneName,
        /// Object that was not found.
        object: ObjectName,
    },

    /// The host has no pickup template to spawn from.
    #[error("no pickup template available")]
    MissingTemplate,
}
