//! Grant effect interpreter for the rando runtime patcher.
//!
//! Turns a collected reward into reads and writes on the persistent progress
//! store, tracker entries and broadcast signals.
//!
//! # Modules
//!
//! - [`interpreter`] -- Dispatch over the closed set of grant kinds
//! - [`staged`] -- Mask shard, vessel fragment and Kingsoul stages
//! - [`companions`] -- Derived flags, spell levels and charm notches
//! - [`tracker`] -- Append-only log of collected rewards
//! - [`error`] -- Dispatch errors

pub mod companions;
pub mod error;
pub mod interpreter;
pub mod staged;
pub mod tracker;

pub use error::GrantError;
pub use interpreter::{GrantContext, GrantInterpreter, GrantOptions};
pub use staged::{StageOutcome, StagedCounter};
pub use tracker::{MemoryTracker, TrackerEntry, TrackerLog};
