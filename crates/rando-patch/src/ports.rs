//! Narrow interfaces to the host runtime.
//!
//! The patcher never touches rendering, physics or UI directly. Everything
//! it needs from the running scene and the dialogue box goes through
//! [`SceneHost`] and [`PromptUi`], which the host implements and tests stub.

use rando_fsm::Fsm;
use rando_types::{ObjectName, SceneName};
use serde::{Deserialize, Serialize};

/// A 2D world position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Position {
    /// Create a position.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Queries and mutations on the loaded scene.
pub trait SceneHost {
    /// Whether an object with this name exists in the scene.
    fn object_exists(&self, scene: &SceneName, object: &ObjectName) -> bool;

    /// Position of an object, if it exists.
    fn object_position(&self, scene: &SceneName, object: &ObjectName) -> Option<Position>;

    /// Whether the named child of `object` is active.
    ///
    /// Returns `None` when the object or the child does not exist.
    fn child_active(&self, scene: &SceneName, object: &ObjectName, child: &str) -> Option<bool>;

    /// A fresh copy of the cached pickup template's FSM.
    fn template_fsm(&self) -> Option<Fsm>;

    /// Instantiate the pickup template under `name` at `at`, running `fsm`,
    /// and activate it.
    fn place_pickup(&mut self, scene: &SceneName, name: &ObjectName, at: Position, fsm: Fsm);
}

/// The yes/no confirmation dialogue.
pub trait PromptUi {
    /// Open the dialogue with the given text and toll.
    fn show(&mut self, text: &str, toll: u32);

    /// Whether the dialogue has reached its ready-for-input sub-state.
    fn is_ready_for_input(&self) -> bool;

    /// Hide the cost display and raise the toll so YES cannot be chosen.
    fn mark_insufficient(&mut self);

    /// Close the dialogue.
    fn close(&mut self);
}
