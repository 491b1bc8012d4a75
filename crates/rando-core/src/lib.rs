//! Run orchestration for the rando runtime patcher.
//!
//! Loads configuration and the item catalog, runs the pre-placement sampler,
//! takes a placement from a [`PlacementAlgorithm`] and turns it into patch
//! rules. The resulting [`Session`] is what the host drives for the rest of
//! the run.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with environment overrides
//! - [`catalog`] -- Catalog document parsing and the embedded default
//! - [`loader`] -- Background catalog parse joined at run start
//! - [`placement`] -- Placement map and algorithm interface
//! - [`run_init`] -- New-run bonuses and the starting loadout grant
//! - [`session`] -- The run session and its event entry points

pub mod catalog;
pub mod config;
pub mod loader;
pub mod placement;
pub mod run_init;
pub mod session;

pub use catalog::{CatalogError, DEFAULT_CATALOG, parse_catalog};
pub use config::{
    ConfigError, LoggingConfig, PatcherConfig, QualityOfLifeConfig, RandoConfig, RunConfig,
};
pub use loader::CatalogLoader;
pub use placement::{Placement, PlacementAlgorithm, PlacementMap, VanillaPlacement, location_cost};
pub use run_init::{START_LOCATION, apply_new_run_bonuses, grant_loadout};
pub use session::{Session, SessionError};
