//! Runtime FSM patcher for the rando workspace.
//!
//! Registered [`PatchRule`]s are matched against object-creation events and
//! scene loads. Each patch kind edits an FSM (or the scene) exactly once per
//! qualifying object, detected by a sentinel.
//!
//! # Modules
//!
//! - [`rule`] -- Targets, patch kinds and outcomes
//! - [`dispatcher`] -- Rule registry and event dispatch
//! - [`gate`] -- Cost-gated yes/no prompt insertion
//! - [`afford`] -- Per-kind affordability checks
//! - [`poll`] -- Cooperative "not enough" polling
//! - [`spawn`] -- New pickups at fixed positions
//! - [`rewire`] -- Plain transition rewiring
//! - [`ports`] -- Host runtime interfaces
//! - [`error`] -- Patch errors

pub mod afford;
pub mod dispatcher;
pub mod error;
pub mod gate;
pub mod poll;
pub mod ports;
pub mod rewire;
pub mod rule;
pub mod spawn;

pub use afford::is_affordable;
pub use dispatcher::{DispatchReport, PatchDispatcher};
pub use error::PatchError;
pub use gate::{GatePatch, PromptContext, open_prompt};
pub use poll::{PollEvent, PollScheduler, PollTask};
pub use ports::{Position, PromptUi, SceneHost};
pub use rewire::{RewirePatch, RewireStep, hostile_shade_fix, void_heart_fix};
pub use rule::{ObjectMatch, PatchKind, PatchOutcome, PatchRule, PatchTarget};
pub use spawn::{SpawnAnchor, SpawnPatch};
