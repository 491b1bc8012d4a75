//! States and transitions.

use serde::{Deserialize, Serialize};

use crate::action::Action;

/// A directed edge fired by a named event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Event name that triggers the transition.
    pub event: String,
    /// Name of the destination state.
    pub target: String,
}

/// One node of a finite-state machine.
///
/// Within a state an event maps to at most one transition. Transition and
/// action order is preserved because the runtime evaluates them in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    name: String,
    transitions: Vec<Transition>,
    actions: Vec<Action>,
}

impl State {
    /// Create a state with no transitions or actions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transitions: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Builder form of [`State::add_transition`].
    #[must_use]
    pub fn with_transition(mut self, event: impl Into<String>, target: impl Into<String>) -> Self {
        self.add_transition(event, target);
        self
    }

    /// Builder form of [`State::append_action`].
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.append_action(action);
        self
    }

    /// The state's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Outgoing transitions in evaluation order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Actions in execution order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Mutable access to the actions, for in-place parameter tweaks.
    pub fn actions_mut(&mut self) -> &mut [Action] {
        &mut self.actions
    }

    /// Target of the transition fired by `event`, if any.
    pub fn target_of(&self, event: &str) -> Option<&str> {
        self.transitions
            .iter()
            .find(|t| t.event == event)
            .map(|t| t.target.as_str())
    }

    /// Target of the first transition, if any.
    pub fn first_target(&self) -> Option<&str> {
        self.transitions.first().map(|t| t.target.as_str())
    }

    /// Copy this state's transitions and actions under a new name.
    pub fn clone_as(&self, new_name: impl Into<String>) -> Self {
        Self {
            name: new_name.into(),
            transitions: self.transitions.clone(),
            actions: self.actions.clone(),
        }
    }

    /// Remove every transition.
    pub fn clear_transitions(&mut self) {
        self.transitions.clear();
    }

    /// Remove every action.
    pub fn clear_actions(&mut self) {
        self.actions.clear();
    }

    /// Add a transition, retargeting the existing one if `event` is taken.
    pub fn add_transition(&mut self, event: impl Into<String>, target: impl Into<String>) {
        let event = event.into();
        let target = target.into();
        if let Some(existing) = self.transitions.iter_mut().find(|t| t.event == event) {
            existing.target = target;
        } else {
            self.transitions.push(Transition { event, target });
        }
    }

    /// Remove every transition pointing at `target` and return how many went.
    pub fn remove_transitions_to(&mut self, target: &str) -> usize {
        let before = self.transitions.len();
        self.transitions.retain(|t| t.target != target);
        before.saturating_sub(self.transitions.len())
    }

    /// Insert an action at the front of the list.
    pub fn insert_action_first(&mut self, action: Action) {
        self.actions.insert(0, action);
    }

    /// Append an action at the end of the list.
    pub fn append_action(&mut self, action: Action) {
        self.actions.push(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_transition_retargets_same_event() {
        let mut state = State::new("Charm?")
            .with_transition("YES", "Trink Flash")
            .with_transition("NO", "Idle");
        state.add_transition("NO", "YN No");

        assert_eq!(state.transitions().len(), 2);
        assert_eq!(state.target_of("NO"), Some("YN No"));
        assert_eq!(state.first_target(), Some("Trink Flash"));
    }

    #[test]
    fn remove_transitions_to_counts_removed() {
        let mut state = State::new("Equipped?")
            .with_transition("EQUIPPED", "Black Charm? 2")
            .with_transition("CANCEL", "Black Charm? 2")
            .with_transition("FINISHED", "Return Points");
        assert_eq!(state.remove_transitions_to("Black Charm? 2"), 2);
        assert_eq!(state.remove_transitions_to("Black Charm? 2"), 0);
        assert_eq!(state.transitions().len(), 1);
    }

    #[test]
    fn clone_as_keeps_contents_under_new_name() {
        let idle = State::new("Idle")
            .with_transition("INSPECT", "Charm?")
            .with_action(Action::Opaque(String::from("Wait")));
        let copy = idle.clone_as("YN No");
        assert_eq!(copy.name(), "YN No");
        assert_eq!(copy.transitions(), idle.transitions());
        assert_eq!(copy.actions(), idle.actions());
    }

    #[test]
    fn insert_action_first_prepends() {
        let mut state = State::new("Trink Flash").with_action(Action::Opaque(String::from("Flash")));
        state.insert_action_first(Action::ClosePrompt);
        assert_eq!(state.actions().first(), Some(&Action::ClosePrompt));
        assert_eq!(state.actions().len(), 2);
    }
}
