//! Finite-state-machine graph model for the rando runtime patcher.
//!
//! Pure data plus structural edits: no I/O, no runtime coupling. The patch
//! kinds in `rando-patch` are built entirely from these primitives.
//!
//! # Modules
//!
//! - [`action`] -- Actions a state runs on entry
//! - [`state`] -- States and their ordered transitions
//! - [`graph`] -- The FSM graph, atomic edits and runtime stepping
//! - [`error`] -- Edit errors

pub mod action;
pub mod error;
pub mod graph;
pub mod state;

pub use action::Action;
pub use error::FsmError;
pub use graph::Fsm;
pub use state::{State, Transition};
