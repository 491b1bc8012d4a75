//! The persistent progress store interface.
//!
//! The host runtime owns and persists player progress. The core reads and
//! writes it only through a [`ProgressStore`] handle passed into each call and
//! never keeps a copy between calls. [`MemoryStore`] is the in-process
//! implementation used by tests and the headless engine.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, SceneName};

/// Well-known progress keys read or written by the core.
pub mod keys {
    /// Geo held.
    pub const GEO: &str = "geo";
    /// Dream essence held.
    pub const DREAM_ORBS: &str = "dreamOrbs";
    /// Simple keys held.
    pub const SIMPLE_KEYS: &str = "simpleKeys";
    /// Whether the waterways manhole has been opened with a simple key.
    pub const OPENED_WATERWAYS_MANHOLE: &str = "openedWaterwaysManhole";
    /// Grubs rescued.
    pub const GRUBS_COLLECTED: &str = "grubsCollected";
    /// Scream spell level.
    pub const SCREAM_LEVEL: &str = "screamLevel";
    /// Whether the dream nail is owned.
    pub const HAS_DREAM_NAIL: &str = "hasDreamNail";

    /// Mask shard progress (0-3).
    pub const HEART_PIECES: &str = "heartPieces";
    /// Set once any mask shard has been collected.
    pub const HEART_PIECE_COLLECTED: &str = "heartPieceCollected";
    /// Base maximum health.
    pub const MAX_HEALTH_BASE: &str = "maxHealthBase";
    /// Current maximum health.
    pub const MAX_HEALTH: &str = "maxHealth";
    /// Upper bound for base maximum health.
    pub const MAX_HEALTH_CAP: &str = "maxHealthCap";
    /// Current health.
    pub const HEALTH: &str = "health";

    /// Vessel fragment progress (0-2).
    pub const VESSEL_FRAGMENTS: &str = "vesselFragments";
    /// Set once any vessel fragment has been collected.
    pub const VESSEL_FRAGMENT_COLLECTED: &str = "vesselFragmentCollected";
    /// Soul reserve capacity.
    pub const MP_RESERVE_MAX: &str = "MPReserveMax";
    /// Upper bound for soul reserve capacity.
    pub const MP_RESERVE_CAP: &str = "MPReserveCap";

    /// Whether the charm menu is unlocked.
    pub const HAS_CHARM: &str = "hasCharm";
    /// Charms owned.
    pub const CHARMS_OWNED: &str = "charmsOwned";
    /// Notches available.
    pub const CHARM_SLOTS: &str = "charmSlots";
    /// Notches occupied by equipped charms.
    pub const CHARM_SLOTS_FILLED: &str = "charmSlotsFilled";
    /// Whether equipped charms exceed available notches.
    pub const OVERCHARMED: &str = "overcharmed";

    /// Whether the map is unlocked.
    pub const HAS_MAP: &str = "hasMap";
    /// Whether the map shop is open.
    pub const OPENED_MAPPER_SHOP: &str = "openedMapperShop";

    /// Dreamers defeated.
    pub const GUARDIANS_DEFEATED: &str = "guardiansDefeated";
    /// Set by the first dreamer defeat, guarding the world bootstrap.
    pub const DREAMER_BOOTSTRAP_DONE: &str = "randoDreamerBootstrapDone";
    /// Unlocked by the first dreamer defeat.
    pub const HORNET_FOUNTAIN_ENCOUNTER: &str = "hornetFountainEncounter";
    /// Unlocked by the first dreamer defeat.
    pub const MARM_OUTSIDE: &str = "marmOutside";
    /// Unlocked by the first dreamer defeat.
    pub const CROSSROADS_INFECTED: &str = "crossroadsInfected";

    /// Kingsoul / Void Heart stage (0-4).
    pub const ROYAL_CHARM_STATE: &str = "royalCharmState";
    /// Kingsoul charm owned.
    pub const GOT_CHARM_36: &str = "gotCharm_36";
    /// Void Heart owned.
    pub const GOT_SHADE_CHARM: &str = "gotShadeCharm";
    /// Notch cost of charm 36.
    pub const CHARM_COST_36: &str = "charmCost_36";
    /// Charm 36 equipped.
    pub const EQUIPPED_CHARM_36: &str = "equippedCharm_36";
}

/// A scene-keyed persisted marker (e.g. a despawned flamebearer).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersistentMarker {
    /// Scene the marker belongs to.
    pub scene: SceneName,
    /// Object id within the scene.
    pub id: String,
    /// Marker value.
    pub activated: bool,
    /// Whether the marker resets on bench.
    pub semi_persistent: bool,
}

/// Abstract key/value surface over the host's persistent progress data.
///
/// Counters are `i32` to match the host save format; every write through the
/// provided helpers saturates instead of overflowing.
pub trait ProgressStore {
    /// Read a flag. Unknown flags read as `false`.
    fn get_bool(&self, key: &str) -> bool;

    /// Write a flag.
    fn set_bool(&mut self, key: &str, value: bool);

    /// Read a counter. Unknown counters read as `0`.
    fn get_int(&self, key: &str) -> i32;

    /// Write a counter.
    fn set_int(&mut self, key: &str, value: i32);

    /// Whether the item's save flag is set.
    fn is_obtained(&self, item: &ItemId) -> bool;

    /// Set the item's save flag.
    fn mark_obtained(&mut self, item: &ItemId);

    /// Persist a scene-keyed marker, replacing any marker with the same key.
    fn save_marker(&mut self, marker: PersistentMarker);

    /// Add `delta` to a counter with saturation and return the new value.
    fn add_int(&mut self, key: &str, delta: i32) -> i32 {
        let value = self.get_int(key).saturating_add(delta);
        self.set_int(key, value);
        value
    }

    /// Increment a counter by one and return the new value.
    fn increment_int(&mut self, key: &str) -> i32 {
        self.add_int(key, 1)
    }
}

/// In-memory [`ProgressStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    bools: BTreeMap<String, bool>,
    ints: BTreeMap<String, i32>,
    obtained: BTreeSet<ItemId>,
    markers: BTreeMap<(SceneName, String), PersistentMarker>,
}

impl MemoryStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            bools: BTreeMap::new(),
            ints: BTreeMap::new(),
            obtained: BTreeSet::new(),
            markers: BTreeMap::new(),
        }
    }

    /// A store seeded with the stats of a fresh save file.
    pub fn new_game() -> Self {
        let mut store = Self::new();
        store.set_int(keys::MAX_HEALTH_BASE, 5);
        store.set_int(keys::MAX_HEALTH, 5);
        store.set_int(keys::HEALTH, 5);
        store.set_int(keys::MAX_HEALTH_CAP, 9);
        store.set_int(keys::MP_RESERVE_CAP, 99);
        store.set_int(keys::CHARM_SLOTS, 3);
        store.set_int(keys::CHARM_COST_36, 5);
        store
    }

    /// Items whose save flag is set.
    pub const fn obtained(&self) -> &BTreeSet<ItemId> {
        &self.obtained
    }

    /// Look up a persisted marker.
    pub fn marker(&self, scene: &SceneName, id: &str) -> Option<&PersistentMarker> {
        self.markers.get(&(scene.clone(), id.to_owned()))
    }

    /// Number of persisted markers.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }
}

impl ProgressStore for MemoryStore {
    fn get_bool(&self, key: &str) -> bool {
        self.bools.get(key).copied().unwrap_or(false)
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.bools.insert(key.to_owned(), value);
    }

    fn get_int(&self, key: &str) -> i32 {
        self.ints.get(key).copied().unwrap_or(0)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.ints.insert(key.to_owned(), value);
    }

    fn is_obtained(&self, item: &ItemId) -> bool {
        self.obtained.contains(item)
    }

    fn mark_obtained(&mut self, item: &ItemId) {
        self.obtained.insert(item.clone());
    }

    fn save_marker(&mut self, marker: PersistentMarker) {
        self.markers
            .insert((marker.scene.clone(), marker.id.clone()), marker);
    }
}
