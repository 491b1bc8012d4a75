//! Enumeration types shared across the workspace.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cost kinds
// ---------------------------------------------------------------------------

/// The resource a gate checks before letting a reward through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostKind {
    /// Geo held by the player. The prompt charges it as a toll.
    Currency,
    /// Dream essence collected.
    Essence,
    /// Simple keys held.
    SimpleKey,
    /// Grubs rescued.
    GrubCount,
    /// Level of the scream spell.
    ScreamLevel,
    /// Whether the dream nail has been obtained.
    DreamNailFlag,
    /// A world-state condition read from a nearby scene object.
    WorldFlag,
}

impl CostKind {
    /// Whether the sampler may re-roll the amount for this kind.
    pub const fn is_sampled(self) -> bool {
        matches!(self, Self::Essence | Self::GrubCount)
    }

    /// Human-readable label for logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Currency => "currency",
            Self::Essence => "essence",
            Self::SimpleKey => "simple_key",
            Self::GrubCount => "grub_count",
            Self::ScreamLevel => "scream_level",
            Self::DreamNailFlag => "dream_nail_flag",
            Self::WorldFlag => "world_flag",
        }
    }
}

impl core::fmt::Display for CostKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Item pools
// ---------------------------------------------------------------------------

/// The pool an item belongs to. Pools are toggled for randomization as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemPool {
    /// The three dreamers.
    Dreamer,
    /// Movement abilities, spells and nail arts.
    Skill,
    /// Charms.
    Charm,
    /// Keys and key-like passes.
    Key,
    /// Geo chests.
    GeoChest,
    /// Mask shards.
    MaskShard,
    /// Vessel fragments.
    VesselFragment,
    /// Pale ore.
    PaleOre,
    /// Charm notches.
    CharmNotch,
    /// Rancid eggs.
    RancidEgg,
    /// Relics (journals, seals, idols, eggs).
    Relic,
    /// Area maps.
    Map,
    /// Stag stations.
    Stag,
    /// Grubs.
    Grub,
    /// Whispering roots (essence).
    Root,
}

// ---------------------------------------------------------------------------
// Trinkets
// ---------------------------------------------------------------------------

/// One of the four relic families, each with a found flag and a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trinket {
    /// Wanderer's Journal.
    WanderersJournal,
    /// Hallownest Seal.
    HallownestSeal,
    /// King's Idol.
    KingsIdol,
    /// Arcane Egg.
    ArcaneEgg,
}

impl Trinket {
    /// The flag set the first time a trinket of this family is found.
    pub const fn found_flag(self) -> &'static str {
        match self {
            Self::WanderersJournal => "foundTrinket1",
            Self::HallownestSeal => "foundTrinket2",
            Self::KingsIdol => "foundTrinket3",
            Self::ArcaneEgg => "foundTrinket4",
        }
    }

    /// The counter incremented for every trinket of this family.
    pub const fn counter(self) -> &'static str {
        match self {
            Self::WanderersJournal => "trinket1",
            Self::HallownestSeal => "trinket2",
            Self::KingsIdol => "trinket3",
            Self::ArcaneEgg => "trinket4",
        }
    }
}

// ---------------------------------------------------------------------------
// Randomization modes
// ---------------------------------------------------------------------------

/// Granularity of the transition randomizer, which constrains safe starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RandomizationMode {
    /// Only items are shuffled.
    #[default]
    Items,
    /// Area transitions are shuffled.
    Areas,
    /// Room transitions are shuffled, keeping areas connected.
    ConnectedAreaRooms,
    /// Room transitions are shuffled.
    Rooms,
}

impl RandomizationMode {
    /// Whether room transitions are shuffled.
    pub const fn rooms(self) -> bool {
        matches!(self, Self::Rooms | Self::ConnectedAreaRooms)
    }

    /// Whether area transitions are shuffled.
    pub const fn areas(self) -> bool {
        matches!(self, Self::Areas)
    }
}
