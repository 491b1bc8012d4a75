//! The placement interface.
//!
//! Deciding which item goes where is not this crate's job. A
//! [`PlacementAlgorithm`] produces a [`PlacementMap`] from the catalog and
//! the pre-placement samples, and the map is fixed for the rest of the run.
//! [`VanillaPlacement`] puts every item back where it came from.

use std::collections::BTreeMap;

use rando_sampler::{CostTable, PrePlacement};
use rando_types::{Catalog, CostKind, CostSpec, GrantKind, ItemId, LocationDef, LocationId};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// What one location hands out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Item placed here.
    pub item: ItemId,
    /// Reward behaviour of the placed item.
    pub kind: GrantKind,
    /// Gate in front of the pickup, if any.
    pub cost: Option<CostSpec>,
}

/// Location to placement mapping for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementMap {
    entries: BTreeMap<LocationId, Placement>,
}

impl PlacementMap {
    /// Create an empty map.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Place `placement` at `location`, replacing any earlier entry.
    pub fn insert(&mut self, location: LocationId, placement: Placement) {
        self.entries.insert(location, placement);
    }

    /// The placement at `location`.
    pub fn get(&self, location: &LocationId) -> Option<&Placement> {
        self.entries.get(location)
    }

    /// Iterate over all placements in location order.
    pub fn iter(&self) -> impl Iterator<Item = (&LocationId, &Placement)> {
        self.entries.iter()
    }

    /// Number of placements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is placed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Produces the placement for a run.
pub trait PlacementAlgorithm {
    /// Map every location to the item it hands out.
    fn place(&self, catalog: &Catalog, pre: &PrePlacement) -> PlacementMap;
}

/// Every location keeps its vanilla item.
#[derive(Debug, Clone, Copy, Default)]
pub struct VanillaPlacement;

impl PlacementAlgorithm for VanillaPlacement {
    fn place(&self, catalog: &Catalog, pre: &PrePlacement) -> PlacementMap {
        let mut map = PlacementMap::new();
        for location in catalog.locations() {
            let Some(def) = catalog.item(&location.vanilla_item) else {
                warn!(location = %location.name, item = %location.vanilla_item, "Vanilla item unknown, location left empty");
                continue;
            };
            map.insert(
                location.name.clone(),
                Placement {
                    item: def.name.clone(),
                    kind: def.kind,
                    cost: location_cost(catalog, &pre.costs, location),
                },
            );
        }
        map
    }
}

/// The gate cost of `location`: its vanilla item's cost kind with the
/// sampled or catalog amount. World-flag gates get the location's near
/// object attached.
pub fn location_cost(catalog: &Catalog, costs: &CostTable, location: &LocationDef) -> Option<CostSpec> {
    let def = catalog.item(&location.vanilla_item)?;
    let cost = costs.cost_spec(def)?;
    match (&location.near_object, cost.kind) {
        (Some(near), CostKind::WorldFlag) => Some(cost.with_near_object(near.clone())),
        _ => Some(cost),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rando_sampler::{StartingLoadout, StartingLocation};

    use super::*;
    use crate::catalog::{DEFAULT_CATALOG, parse_catalog};

    fn pre() -> PrePlacement {
        PrePlacement {
            costs: CostTable::default(),
            loadout: StartingLoadout::default(),
            start: StartingLocation {
                name: String::from("King's Pass"),
                progression: Vec::new(),
            },
        }
    }

    #[test]
    fn vanilla_placement_covers_every_location() {
        let catalog = parse_catalog(DEFAULT_CATALOG).unwrap();
        let map = VanillaPlacement.place(&catalog, &pre());
        assert_eq!(map.len(), catalog.locations().count());

        let gate = map.get(&LocationId::from("Dream_Gate")).unwrap();
        assert_eq!(gate.item, ItemId::from("Dream_Gate"));
        assert_eq!(gate.cost.as_ref().map(|c| (c.kind, c.amount)), Some((CostKind::Essence, 900)));

        let cloak = map.get(&LocationId::from("Mothwing_Cloak")).unwrap();
        assert!(cloak.cost.is_none());
    }

    #[test]
    fn world_flag_cost_carries_near_object() {
        let catalog = parse_catalog(DEFAULT_CATALOG).unwrap();
        let location = catalog.location(&LocationId::from("Hallownest_Seal-Greenpath")).unwrap();
        let cost = location_cost(&catalog, &CostTable::default(), location).unwrap();
        assert_eq!(cost.kind, CostKind::WorldFlag);
        assert_eq!(cost.near_object.as_ref().map(rando_types::ObjectName::as_str), Some("Dream Plant"));
    }
}
