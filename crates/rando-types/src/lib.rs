//! Shared type definitions for the rando runtime patcher.
//!
//! This crate is the single source of truth for the data exchanged between
//! the FSM patcher, the grant interpreter and the pre-placement sampler.
//!
//! # Modules
//!
//! - [`ids`] -- Name newtypes and UUID v7 identifiers
//! - [`enums`] -- Cost kinds, item pools, trinkets, randomization modes
//! - [`cost`] -- Gate cost descriptions
//! - [`effect`] -- The closed set of grant effects
//! - [`catalog`] -- Item, location and start definitions
//! - [`store`] -- The persistent progress store interface
//! - [`signal`] -- Broadcast signals to the host runtime

pub mod catalog;
pub mod cost;
pub mod effect;
pub mod enums;
pub mod ids;
pub mod signal;
pub mod store;

// Re-export all public types at crate root for convenience.
pub use catalog::{Catalog, ItemDef, LocationDef, SpawnDef, StartDef};
pub use cost::CostSpec;
pub use effect::{GrantEffect, GrantKind, UnknownEffectKind};
pub use enums::{CostKind, ItemPool, RandomizationMode, Trinket};
pub use ids::{FsmName, ItemId, LocationId, ObjectName, PollTaskId, SceneName, TrackerEntryId};
pub use signal::{Signal, SignalSink};
pub use store::{MemoryStore, PersistentMarker, ProgressStore, keys};
