//! Pre-placement sampler for the rando workspace.
//!
//! Runs once before placement: re-rolls essence and grub costs, draws the
//! starting loadout and picks the starting location. All randomness comes
//! from the caller's RNG, so a seeded RNG gives a reproducible run.
//!
//! # Modules
//!
//! - [`settings`] -- Randomization settings
//! - [`costs`] -- Cost re-rolls
//! - [`loadout`] -- Tiered starting loadout
//! - [`start`] -- Starting location and its progression
//! - [`error`] -- Sampling errors

pub mod costs;
pub mod error;
pub mod loadout;
pub mod settings;
pub mod start;

use rand::Rng;
use rando_types::Catalog;
use serde::{Deserialize, Serialize};

pub use costs::{CostTable, sample_costs};
pub use error::SamplerError;
pub use loadout::{StartingLoadout, sample_starting_loadout, take_random};
pub use settings::SamplerSettings;
pub use start::{DEFAULT_START, StartingLocation, is_safe_start, sample_starting_location};

/// Everything sampled before placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrePlacement {
    /// Re-rolled gate costs.
    pub costs: CostTable,
    /// Items granted at the start.
    pub loadout: StartingLoadout,
    /// Where the run starts.
    pub start: StartingLocation,
}

/// Sample costs, then the loadout, then the start.
pub fn sample_all(
    catalog: &Catalog,
    settings: &SamplerSettings,
    rng: &mut impl Rng,
) -> Result<PrePlacement, SamplerError> {
    let costs = sample_costs(catalog, settings, rng);
    let loadout = sample_starting_loadout(catalog, settings, rng)?;
    let start = sample_starting_location(catalog, settings, rng)?;
    Ok(PrePlacement {
        costs,
        loadout,
        start,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rando_types::StartDef;

    use super::*;

    #[test]
    fn same_seed_same_result() {
        let catalog = Catalog::new(
            [],
            [],
            [StartDef {
                name: String::from(DEFAULT_START),
                waypoint: String::from("Kings Pass waypoint"),
                area_transition: None,
                room_transition: None,
                item_safe: true,
                area_safe: true,
                room_safe: true,
            }],
            BTreeMap::new(),
        );
        let settings = SamplerSettings::default();
        let a = sample_all(&catalog, &settings, &mut StdRng::seed_from_u64(9));
        let b = sample_all(&catalog, &settings, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
        assert!(a.is_ok_and(|p| p.loadout.is_empty() && p.costs.is_empty()));
    }
}
