//! Catalog definitions for items, locations and starting locations.
//!
//! The [`Catalog`] is built once at startup (parsed in the background by
//! `rando-core`) and treated as immutable afterwards. Every lookup returns
//! borrowed data; nothing here mutates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::effect::GrantKind;
use crate::enums::{CostKind, ItemPool};
use crate::ids::{FsmName, ItemId, LocationId, ObjectName, SceneName};

/// Static description of a grantable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    /// Catalog name.
    pub name: ItemId,
    /// Pool the item is randomized with.
    pub pool: ItemPool,
    /// Reward behaviour when collected.
    pub kind: GrantKind,
    /// Label shown in prompts.
    pub label: String,
    /// Flag set by flag-style grants.
    #[serde(default)]
    pub bool_name: Option<String>,
    /// Additional flag set alongside `bool_name` (dreamer masks).
    #[serde(default)]
    pub secondary_bool: Option<String>,
    /// Counter incremented by counter-style grants.
    #[serde(default)]
    pub int_name: Option<String>,
    /// Equip flag for charms granted pre-equipped.
    #[serde(default)]
    pub equip_bool_name: Option<String>,
    /// Notches the charm occupies when equipped.
    #[serde(default)]
    pub notch_cost: u32,
    /// Geo or essence granted.
    #[serde(default)]
    pub amount: u32,
    /// Gate cost kind at the item's vanilla location, if gated.
    #[serde(default)]
    pub cost_kind: Option<CostKind>,
    /// Default gate cost. May be negative in hand-edited catalogs.
    #[serde(default)]
    pub cost: i64,
    /// Whether the item unlocks logic progression.
    #[serde(default)]
    pub progression: bool,
}

/// Where a new pickup is spawned when a location has no pickup of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnDef {
    /// Literal x coordinate.
    #[serde(default)]
    pub x: f32,
    /// Literal y coordinate.
    #[serde(default)]
    pub y: f32,
    /// Existing object whose position is used instead of the coordinates.
    #[serde(default)]
    pub at_object: Option<ObjectName>,
}

/// Static description of a location holding a pickup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDef {
    /// Catalog name.
    pub name: LocationId,
    /// Scene the pickup lives in.
    pub scene: SceneName,
    /// Name of the pickup object.
    pub object: ObjectName,
    /// FSM driving the pickup.
    pub fsm: FsmName,
    /// Item found here in the unmodified game.
    pub vanilla_item: ItemId,
    /// Object inspected by world-flag gates at this location.
    #[serde(default)]
    pub near_object: Option<ObjectName>,
    /// Present when the pickup must be spawned rather than patched in place.
    #[serde(default)]
    pub spawn: Option<SpawnDef>,
}

/// Static description of a starting location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartDef {
    /// Display and lookup name.
    pub name: String,
    /// Waypoint granted as progression unless rooms are shuffled.
    pub waypoint: String,
    /// Area transition granted when areas are shuffled.
    #[serde(default)]
    pub area_transition: Option<String>,
    /// Room transition granted when rooms are shuffled.
    #[serde(default)]
    pub room_transition: Option<String>,
    /// Safe with item randomization only.
    #[serde(default)]
    pub item_safe: bool,
    /// Safe with area randomization.
    #[serde(default)]
    pub area_safe: bool,
    /// Safe with room randomization.
    #[serde(default)]
    pub room_safe: bool,
}

/// Immutable catalog of everything the core knows about items and places.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    items: BTreeMap<ItemId, ItemDef>,
    locations: BTreeMap<LocationId, LocationDef>,
    starts: BTreeMap<String, StartDef>,
    additive_families: BTreeMap<String, Vec<ItemId>>,
}

impl Catalog {
    /// Assemble a catalog from its parts.
    pub fn new(
        items: impl IntoIterator<Item = ItemDef>,
        locations: impl IntoIterator<Item = LocationDef>,
        starts: impl IntoIterator<Item = StartDef>,
        additive_families: BTreeMap<String, Vec<ItemId>>,
    ) -> Self {
        Self {
            items: items.into_iter().map(|d| (d.name.clone(), d)).collect(),
            locations: locations.into_iter().map(|d| (d.name.clone(), d)).collect(),
            starts: starts.into_iter().map(|d| (d.name.clone(), d)).collect(),
            additive_families,
        }
    }

    /// Look up an item definition.
    pub fn item(&self, id: &ItemId) -> Option<&ItemDef> {
        self.items.get(id)
    }

    /// Iterate over all item definitions in name order.
    pub fn items(&self) -> impl Iterator<Item = &ItemDef> {
        self.items.values()
    }

    /// Number of items in the catalog.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Look up a location definition.
    pub fn location(&self, id: &LocationId) -> Option<&LocationDef> {
        self.locations.get(id)
    }

    /// Iterate over all location definitions in name order.
    pub fn locations(&self) -> impl Iterator<Item = &LocationDef> {
        self.locations.values()
    }

    /// Look up a starting location by name.
    pub fn start(&self, name: &str) -> Option<&StartDef> {
        self.starts.get(name)
    }

    /// Iterate over all starting locations in name order.
    pub fn starts(&self) -> impl Iterator<Item = &StartDef> {
        self.starts.values()
    }

    /// The ordered additive family containing `item`, if any.
    pub fn additive_family_of(&self, item: &ItemId) -> Option<&[ItemId]> {
        self.additive_families
            .values()
            .find(|members| members.contains(item))
            .map(Vec::as_slice)
    }

    /// Item ids granted with the given kind.
    pub fn items_of_kind(&self, kind: GrantKind) -> Vec<&ItemId> {
        self.items
            .values()
            .filter(|d| d.kind == kind)
            .map(|d| &d.name)
            .collect()
    }
}
