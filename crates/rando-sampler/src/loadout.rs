//! Starting loadout sampling.
//!
//! The loadout is drawn tier by tier. Each tier draws without replacement
//! and never repeats an item picked by an earlier tier:
//!
//! | tier | picks | candidates |
//! |------|-------|------------|
//! | 1 | exactly 1 | wall cling or double jump |
//! | 2 | exactly 1 | tier 1 plus dash and super dash, minus the tier 1 pick |
//! | 3 | 0 to 3 | advanced skills |
//! | 4 | 0 to 4 minus tier 3 | keys and passes |
//! | charms | 1 to 2 | every charm not already picked |

use rand::Rng;
use rando_types::{Catalog, GrantKind, ItemId};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SamplerError;
use crate::settings::SamplerSettings;

/// Tier 1 candidates.
pub const TIER_1: [&str; 2] = ["Mantis_Claw", "Monarch_Wings"];
/// Tier 2 candidates.
pub const TIER_2: [&str; 4] = ["Mantis_Claw", "Monarch_Wings", "Mothwing_Cloak", "Crystal_Heart"];
/// Tier 3 candidates.
pub const TIER_3: [&str; 9] = [
    "Shade_Cloak",
    "Isma's_Tear",
    "Vengeful_Spirit",
    "Howling_Wraiths",
    "Desolate_Dive",
    "Cyclone_Slash",
    "Great_Slash",
    "Dash_Slash",
    "Dream_Nail",
];
/// Tier 4 candidates.
pub const TIER_4: [&str; 8] = [
    "City_Crest",
    "Lumafly_Lantern",
    "Tram_Pass",
    "Simple_Key-Sly",
    "Shopkeeper's_Key",
    "Elegant_Key",
    "Love_Key",
    "King's_Brand",
];

/// Combined cap on tier 3 and tier 4 picks.
const LATE_TIER_CAP: usize = 4;
/// Most tier 3 picks.
const TIER_3_MAX: usize = 3;

/// Items granted at the start of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingLoadout {
    /// Every picked item, in pick order.
    pub items: Vec<ItemId>,
    /// The picks that unlock logic progression.
    pub progression: Vec<ItemId>,
}

impl StartingLoadout {
    /// Whether nothing is granted.
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Remove and return a uniformly chosen element.
pub fn take_random<T>(pool: &mut Vec<T>, rng: &mut impl Rng) -> Option<T> {
    if pool.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..pool.len());
    Some(pool.swap_remove(idx))
}

/// Sample the starting loadout. Empty when start items are not randomized.
pub fn sample_starting_loadout(
    catalog: &Catalog,
    settings: &SamplerSettings,
    rng: &mut impl Rng,
) -> Result<StartingLoadout, SamplerError> {
    let mut loadout = StartingLoadout::default();
    if !settings.randomize_start_items {
        return Ok(loadout);
    }

    let mut tier_1 = candidates(catalog, &TIER_1, &loadout.items);
    let first = take_random(&mut tier_1, rng).ok_or(SamplerError::EmptyPool { tier: "1" })?;
    loadout.items.push(first);

    let mut tier_2 = candidates(catalog, &TIER_2, &loadout.items);
    let second = take_random(&mut tier_2, rng).ok_or(SamplerError::EmptyPool { tier: "2" })?;
    loadout.items.push(second);

    let mut tier_3 = candidates(catalog, &TIER_3, &loadout.items);
    let tier_3_count = rng.random_range(0..=TIER_3_MAX);
    let tier_3_picks = draw(&mut tier_3, tier_3_count, rng);
    let taken = tier_3_picks.len();
    loadout.items.extend(tier_3_picks);

    let mut tier_4 = candidates(catalog, &TIER_4, &loadout.items);
    let tier_4_count = rng.random_range(0..=LATE_TIER_CAP.saturating_sub(taken));
    loadout.items.extend(draw(&mut tier_4, tier_4_count, rng));

    let mut charms: Vec<ItemId> = catalog
        .items_of_kind(GrantKind::EquipCharmAndIncrement)
        .into_iter()
        .filter(|id| !loadout.items.contains(id))
        .cloned()
        .collect();
    let charm_count = rng.random_range(1..=2_usize);
    let charm_picks = draw(&mut charms, charm_count, rng);
    if charm_picks.is_empty() {
        return Err(SamplerError::EmptyPool { tier: "charms" });
    }
    loadout.items.extend(charm_picks);

    loadout.progression = loadout
        .items
        .iter()
        .filter(|id| catalog.item(id).is_some_and(|def| def.progression))
        .cloned()
        .collect();

    info!(
        items = loadout.items.len(),
        progression = loadout.progression.len(),
        "Starting loadout sampled"
    );
    Ok(loadout)
}

/// Tier names that exist in the catalog and were not already picked.
fn candidates(catalog: &Catalog, tier: &[&str], picked: &[ItemId]) -> Vec<ItemId> {
    tier.iter()
        .map(|name| ItemId::from(*name))
        .filter(|id| {
            let known = catalog.item(id).is_some();
            if !known {
                warn!(item = %id, "Loadout candidate missing from catalog");
            }
            known && !picked.contains(id)
        })
        .collect()
}

/// Draw up to `count` items without replacement.
fn draw(pool: &mut Vec<ItemId>, count: usize, rng: &mut impl Rng) -> Vec<ItemId> {
    (0..count).map_while(|_| take_random(pool, rng)).collect()
}
