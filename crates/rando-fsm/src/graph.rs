//! The finite-state machine graph.
//!
//! An [`Fsm`] owns its states by name and one runtime-driven active-state
//! pointer. Structural edits on the live graph go through [`Fsm::edit`],
//! which applies them to a copy, checks every transition target and only
//! then swaps the copy in, so a failed edit leaves the live FSM untouched.

use std::collections::BTreeMap;

use rando_types::FsmName;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FsmError;
use crate::state::State;

/// A named finite-state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fsm {
    name: FsmName,
    states: BTreeMap<String, State>,
    active: Option<String>,
}

impl Fsm {
    /// Create an FSM with no states.
    pub const fn new(name: FsmName) -> Self {
        Self {
            name,
            states: BTreeMap::new(),
            active: None,
        }
    }

    /// The FSM's name.
    pub const fn name(&self) -> &FsmName {
        &self.name
    }

    // -------------------------------------------------------------------
    // State access
    // -------------------------------------------------------------------

    /// Look up a state.
    ///
    /// # Errors
    ///
    /// Returns [`FsmError::NotFound`] if no state has that name.
    pub fn state(&self, name: &str) -> Result<&State, FsmError> {
        self.states
            .get(name)
            .ok_or_else(|| FsmError::NotFound(name.to_owned()))
    }

    /// Look up a state mutably.
    ///
    /// # Errors
    ///
    /// Returns [`FsmError::NotFound`] if no state has that name.
    pub fn state_mut(&mut self, name: &str) -> Result<&mut State, FsmError> {
        self.states
            .get_mut(name)
            .ok_or_else(|| FsmError::NotFound(name.to_owned()))
    }

    /// Whether a state with that name exists.
    pub fn has_state(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// Number of states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Iterate over states in name order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }

    // -------------------------------------------------------------------
    // Structural edits
    // -------------------------------------------------------------------

    /// Add a state.
    ///
    /// # Errors
    ///
    /// Returns [`FsmError::DuplicateState`] if the name is taken.
    pub fn add_state(&mut self, state: State) -> Result<(), FsmError> {
        if self.states.contains_key(state.name()) {
            return Err(FsmError::DuplicateState(state.name().to_owned()));
        }
        self.states.insert(state.name().to_owned(), state);
        Ok(())
    }

    /// Builder form of [`Fsm::add_state`].
    ///
    /// # Errors
    ///
    /// Returns [`FsmError::DuplicateState`] if the name is taken.
    pub fn with_state(mut self, state: State) -> Result<Self, FsmError> {
        self.add_state(state)?;
        Ok(self)
    }

    /// Copy `source` under `new_name` and add the copy.
    ///
    /// # Errors
    ///
    /// Returns [`FsmError::NotFound`] if `source` is missing or
    /// [`FsmError::DuplicateState`] if `new_name` is taken.
    pub fn clone_state(&mut self, source: &str, new_name: &str) -> Result<(), FsmError> {
        let copy = self.state(source)?.clone_as(new_name);
        self.add_state(copy)
    }

    /// Check that every transition target resolves to a state.
    ///
    /// # Errors
    ///
    /// Returns the first [`FsmError::DanglingTransition`] found.
    pub fn validate(&self) -> Result<(), FsmError> {
        for state in self.states.values() {
            for transition in state.transitions() {
                if !self.states.contains_key(&transition.target) {
                    return Err(FsmError::DanglingTransition {
                        state: state.name().to_owned(),
                        event: transition.event.clone(),
                        target: transition.target.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Apply a batch of edits atomically.
    ///
    /// `f` runs against a copy of the graph. The copy replaces the live graph
    /// only if `f` succeeds and the result validates. The active-state
    /// pointer is preserved.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns, or the validation failure converted
    /// into `E`.
    pub fn edit<E, F>(&mut self, f: F) -> Result<(), E>
    where
        E: From<FsmError>,
        F: FnOnce(&mut Self) -> Result<(), E>,
    {
        let mut draft = self.clone();
        f(&mut draft)?;
        draft.validate()?;
        draft.active.clone_from(&self.active);
        debug!(
            fsm = %self.name,
            states_before = self.states.len(),
            states_after = draft.states.len(),
            "FSM edit committed"
        );
        *self = draft;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Runtime stepping
    // -------------------------------------------------------------------

    /// The currently active state, if the FSM has been started.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Point the FSM at a state.
    ///
    /// # Errors
    ///
    /// Returns [`FsmError::NotFound`] if no state has that name.
    pub fn set_active(&mut self, name: &str) -> Result<(), FsmError> {
        if !self.states.contains_key(name) {
            return Err(FsmError::NotFound(name.to_owned()));
        }
        self.active = Some(name.to_owned());
        Ok(())
    }

    /// Send an event to the active state.
    ///
    /// Returns the newly entered state when the active state handles the
    /// event, or `None` when the event is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FsmError::NotFound`] if the transition target is missing.
    pub fn fire(&mut self, event: &str) -> Result<Option<&State>, FsmError> {
        let Some(current) = self.active.as_deref() else {
            return Ok(None);
        };
        let Some(target) = self.state(current)?.target_of(event).map(str::to_owned) else {
            return Ok(None);
        };
        self.set_active(&target)?;
        self.state(&target).map(Some)
    }
}
