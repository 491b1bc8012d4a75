//! The rewire patch: plain transition surgery on an existing FSM.
//!
//! Used where the runtime's own graph must be bent rather than extended,
//! e.g. letting Void Heart be unequipped or keeping a shade hostile. Steps
//! run atomically. A second application produces the same graph and is
//! reported as already applied.

use rando_fsm::Fsm;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::PatchError;
use crate::rule::PatchOutcome;

/// One edit of a rewire patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewireStep {
    /// Remove every transition out of `state`.
    ClearTransitions {
        /// State to clear.
        state: String,
    },
    /// Remove every transition from `state` into `target`.
    RemoveTransitionsTo {
        /// Source state.
        state: String,
        /// Target to disconnect.
        target: String,
    },
    /// Add (or retarget) `state --event--> target`.
    AddTransition {
        /// Source state.
        state: String,
        /// Triggering event.
        event: String,
        /// Destination state.
        target: String,
    },
}

/// An ordered list of rewire steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewirePatch {
    /// Steps in application order.
    pub steps: Vec<RewireStep>,
}

impl RewirePatch {
    /// Create an empty patch.
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append a `ClearTransitions` step.
    #[must_use]
    pub fn clear_transitions(mut self, state: &str) -> Self {
        self.steps.push(RewireStep::ClearTransitions {
            state: state.to_owned(),
        });
        self
    }

    /// Append a `RemoveTransitionsTo` step.
    #[must_use]
    pub fn remove_transitions_to(mut self, state: &str, target: &str) -> Self {
        self.steps.push(RewireStep::RemoveTransitionsTo {
            state: state.to_owned(),
            target: target.to_owned(),
        });
        self
    }

    /// Append an `AddTransition` step.
    #[must_use]
    pub fn add_transition(mut self, state: &str, event: &str, target: &str) -> Self {
        self.steps.push(RewireStep::AddTransition {
            state: state.to_owned(),
            event: event.to_owned(),
            target: target.to_owned(),
        });
        self
    }

    /// Apply every step to `fsm`, or none of them.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::GraphShapeMismatch`] if a named state is
    /// missing or a new transition dangles.
    pub fn apply(&self, fsm: &mut Fsm) -> Result<PatchOutcome, PatchError> {
        let before = fsm.clone();
        fsm.edit(|draft| -> Result<(), PatchError> {
            for step in &self.steps {
                match step {
                    RewireStep::ClearTransitions { state } => {
                        draft.state_mut(state)?.clear_transitions();
                    }
                    RewireStep::RemoveTransitionsTo { state, target } => {
                        let removed = draft.state_mut(state)?.remove_transitions_to(target);
                        debug!(state = %state, target = %target, removed, "Transitions removed");
                    }
                    RewireStep::AddTransition {
                        state,
                        event,
                        target,
                    } => {
                        draft
                            .state_mut(state)?
                            .add_transition(event.as_str(), target.as_str());
                    }
                }
            }
            Ok(())
        })?;

        if *fsm == before {
            debug!(fsm = %fsm.name(), "Rewire already in place");
            return Ok(PatchOutcome::AlreadyApplied);
        }
        info!(fsm = %fsm.name(), steps = self.steps.len(), "FSM rewired");
        Ok(PatchOutcome::Applied)
    }
}

/// Let Void Heart be unequipped like any other charm.
pub fn void_heart_fix() -> RewirePatch {
    RewirePatch::new()
        .remove_transitions_to("Equipped?", "Black Charm? 2")
        .add_transition("Equipped?", "EQUIPPED", "Return Points")
        .remove_transitions_to("Set Current Item Num", "Black Charm?")
        .add_transition("Set Current Item Num", "FINISHED", "Return Points")
}

/// Keep shades hostile regardless of Void Heart.
pub fn hostile_shade_fix() -> RewirePatch {
    RewirePatch::new()
        .clear_transitions("Pause")
        .add_transition("Pause", "FINISHED", "Init")
}
