//! Grant effects: what happens to persistent state when a reward is collected.
//!
//! [`GrantKind`] is a closed enumeration. Effect names only exist as strings
//! at the catalog boundary, where [`GrantKind::from_str`] rejects anything
//! outside the set with [`UnknownEffectKind`].

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::enums::Trinket;
use crate::ids::{ItemId, LocationId};

/// An effect name that is not part of the closed [`GrantKind`] set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown effect kind: {0}")]
pub struct UnknownEffectKind(pub String);

/// The reward behaviour applied when an item is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GrantKind {
    /// Set the item's flag.
    SetFlag,
    /// Increment the item's counter.
    IncrementCounter,
    /// Give a charm, optionally equipping it.
    EquipCharmAndIncrement,
    /// Set the next flag of the item's additive family.
    AdditiveSequenceStep,
    /// Add geo.
    AddCurrency,
    /// Unlock the map and the item's area map.
    GrantMapAccess,
    /// Unlock a stag station.
    GrantStagBenefit,
    /// Rescue a grub.
    CollectGrub,
    /// Add dream essence.
    CollectEssence,
    /// Advance mask shard progress.
    MaskShardStep,
    /// Advance vessel fragment progress.
    VesselFragmentStep,
    /// Find a relic of the given family.
    TrinketStep(Trinket),
    /// Defeat one of the dreamers.
    DreamerDefeat,
    /// Advance the Kingsoul / Void Heart charm stage.
    KingsoulStep,
    /// Unlock Grimmchild and skip its first two quests.
    GrimmchildUnlock,
    /// Only the bookkeeping shared by every grant.
    NoOp,
}

impl GrantKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 19] = [
        Self::SetFlag,
        Self::IncrementCounter,
        Self::EquipCharmAndIncrement,
        Self::AdditiveSequenceStep,
        Self::AddCurrency,
        Self::GrantMapAccess,
        Self::GrantStagBenefit,
        Self::CollectGrub,
        Self::CollectEssence,
        Self::MaskShardStep,
        Self::VesselFragmentStep,
        Self::TrinketStep(Trinket::WanderersJournal),
        Self::TrinketStep(Trinket::HallownestSeal),
        Self::TrinketStep(Trinket::KingsIdol),
        Self::TrinketStep(Trinket::ArcaneEgg),
        Self::DreamerDefeat,
        Self::KingsoulStep,
        Self::GrimmchildUnlock,
        Self::NoOp,
    ];

    /// Canonical name used in the catalog.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SetFlag => "set_flag",
            Self::IncrementCounter => "increment_counter",
            Self::EquipCharmAndIncrement => "equip_charm_and_increment",
            Self::AdditiveSequenceStep => "additive_sequence_step",
            Self::AddCurrency => "add_currency",
            Self::GrantMapAccess => "grant_map_access",
            Self::GrantStagBenefit => "grant_stag_benefit",
            Self::CollectGrub => "collect_grub",
            Self::CollectEssence => "collect_essence",
            Self::MaskShardStep => "mask_shard_step",
            Self::VesselFragmentStep => "vessel_fragment_step",
            Self::TrinketStep(Trinket::WanderersJournal) => "trinket_step.wanderers_journal",
            Self::TrinketStep(Trinket::HallownestSeal) => "trinket_step.hallownest_seal",
            Self::TrinketStep(Trinket::KingsIdol) => "trinket_step.kings_idol",
            Self::TrinketStep(Trinket::ArcaneEgg) => "trinket_step.arcane_egg",
            Self::DreamerDefeat => "dreamer_defeat",
            Self::KingsoulStep => "kingsoul_step",
            Self::GrimmchildUnlock => "grimmchild_unlock",
            Self::NoOp => "no_op",
        }
    }
}

impl FromStr for GrantKind {
    type Err = UnknownEffectKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEffectKind(s.to_owned()))
    }
}

impl TryFrom<String> for GrantKind {
    type Error = UnknownEffectKind;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GrantKind> for String {
    fn from(kind: GrantKind) -> Self {
        kind.as_str().to_owned()
    }
}

impl core::fmt::Display for GrantKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reward application: which behaviour, for which item, collected where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantEffect {
    /// The behaviour to apply.
    pub kind: GrantKind,
    /// The item being granted.
    pub item: ItemId,
    /// The location it was collected at.
    pub location: LocationId,
    /// Optional amount overriding the catalog value (currency, essence).
    #[serde(default)]
    pub param: Option<i64>,
}

impl GrantEffect {
    /// Create an effect without a numeric override.
    pub const fn new(kind: GrantKind, item: ItemId, location: LocationId) -> Self {
        Self {
            kind,
            item,
            location,
            param: None,
        }
    }

    /// Attach a numeric override.
    #[must_use]
    pub const fn with_param(mut self, param: i64) -> Self {
        self.param = Some(param);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_parses_from_its_name() {
        for kind in GrantKind::ALL {
            assert_eq!(kind.as_str().parse::<GrantKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let parsed = "spawn_geo".parse::<GrantKind>();
        assert_eq!(parsed, Err(UnknownEffectKind(String::from("spawn_geo"))));
    }

    #[test]
    fn effect_deserializes_kind_from_string() {
        let json = r#"{"kind":"trinket_step.kings_idol","item":"King's_Idol","location":"Pale_Lurker"}"#;
        let effect: Result<GrantEffect, _> = serde_json::from_str(json);
        let effect = effect.ok();
        assert_eq!(
            effect.map(|e| e.kind),
            Some(GrantKind::TrinketStep(Trinket::KingsIdol))
        );
    }

    #[test]
    fn effect_with_unknown_kind_fails_to_deserialize() {
        let json = r#"{"kind":"teleport","item":"A","location":"B"}"#;
        let effect: Result<GrantEffect, _> = serde_json::from_str(json);
        assert!(effect.is_err());
    }
}
