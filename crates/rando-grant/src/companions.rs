//! Flags that must move together with the flags items set.
//!
//! Some abilities are stored twice in the save data, spell upgrades are
//! tracked by a level counter next to their flag, and nail arts have two
//! summary flags derived from the three individual arts. Every item flag the
//! interpreter sets goes through [`set_item_flag`] so these stay consistent.

use rando_types::{ProgressStore, Signal, SignalSink};
use tracing::debug;

/// Item flag paired with a second flag that must carry the same value.
const SECONDARY_FLAGS: [(&str, &str); 7] = [
    ("hasDash", "canDash"),
    ("hasShadowDash", "canShadowDash"),
    ("hasSuperDash", "canSuperDash"),
    ("hasWalljump", "canWallJump"),
    ("gotCharm_23", "fragileHealth_unbreakable"),
    ("gotCharm_24", "fragileGreed_unbreakable"),
    ("gotCharm_25", "fragileStrength_unbreakable"),
];

/// Spell flag, its level counter and the minimum level it implies.
const SPELL_LEVELS: [(&str, &str, i32); 6] = [
    ("hasVengefulSpirit", "fireballLevel", 1),
    ("hasShadeSoul", "fireballLevel", 2),
    ("hasDesolateDive", "quakeLevel", 1),
    ("hasDescendingDark", "quakeLevel", 2),
    ("hasHowlingWraiths", "screamLevel", 1),
    ("hasAbyssShriek", "screamLevel", 2),
];

const NAIL_ARTS: [&str; 3] = ["hasCyclone", "hasUpwardSlash", "hasDashSlash"];

/// Charms-owned thresholds at which a free notch is awarded.
const NOTCH_THRESHOLDS: [(&str, i32); 4] = [
    ("salubraNotch1", 5),
    ("salubraNotch2", 10),
    ("salubraNotch3", 18),
    ("salubraNotch4", 25),
];

/// Set an item flag to `true` together with everything derived from it.
pub fn set_item_flag(store: &mut dyn ProgressStore, signals: &mut dyn SignalSink, key: &str) {
    store.set_bool(key, true);

    if let Some((_, companion)) = SECONDARY_FLAGS.iter().find(|(flag, _)| *flag == key) {
        store.set_bool(companion, true);
    }

    for (flag, counter, level) in SPELL_LEVELS {
        if flag == key && store.get_int(counter) < level {
            store.set_int(counter, level);
        }
    }

    if NAIL_ARTS.contains(&key) {
        let owned = NAIL_ARTS.iter().filter(|art| store.get_bool(art)).count();
        store.set_bool("hasNailArt", owned > 0);
        store.set_bool("hasAllNailArts", owned == NAIL_ARTS.len());
    }

    if key == "hasAcidArmour" {
        signals.broadcast(Signal::GetAcidArmour);
    }
}

/// Award any charm notches earned by the current charm count.
///
/// Each threshold pays out once per run. Returns the number of notches
/// added by this call.
pub fn award_charm_notches(store: &mut dyn ProgressStore) -> u32 {
    let charms = store.get_int(rando_types::keys::CHARMS_OWNED);
    let mut awarded = 0_u32;
    for (flag, threshold) in NOTCH_THRESHOLDS {
        if !store.get_bool(flag) && charms >= threshold {
            store.set_bool(flag, true);
            store.increment_int(rando_types::keys::CHARM_SLOTS);
            awarded = awarded.saturating_add(1);
        }
    }
    if awarded > 0 {
        debug!(charms, awarded, "Charm notches awarded");
        refresh_overcharm(store);
    }
    awarded
}

/// Recompute the overcharm flag from notch usage.
pub fn refresh_overcharm(store: &mut dyn ProgressStore) {
    let filled = store.get_int(rando_types::keys::CHARM_SLOTS_FILLED);
    let slots = store.get_int(rando_types::keys::CHARM_SLOTS);
    store.set_bool(rando_types::keys::OVERCHARMED, filled > slots);
}

#[cfg(test)]
mod tests {
    use rando_types::{MemoryStore, keys};

    use super::*;

    #[test]
    fn dash_sets_can_dash() {
        let mut store = MemoryStore::new();
        let mut signals: Vec<Signal> = Vec::new();
        set_item_flag(&mut store, &mut signals, "hasDash");
        assert!(store.get_bool("canDash"));
        assert!(signals.is_empty());
    }

    #[test]
    fn nail_arts_are_recomputed() {
        let mut store = MemoryStore::new();
        let mut signals: Vec<Signal> = Vec::new();
        set_item_flag(&mut store, &mut signals, "hasCyclone");
        assert!(store.get_bool("hasNailArt"));
        assert!(!store.get_bool("hasAllNailArts"));

        set_item_flag(&mut store, &mut signals, "hasUpwardSlash");
        set_item_flag(&mut store, &mut signals, "hasDashSlash");
        assert!(store.get_bool("hasAllNailArts"));
    }

    #[test]
    fn spell_level_never_decreases() {
        let mut store = MemoryStore::new();
        let mut signals: Vec<Signal> = Vec::new();
        set_item_flag(&mut store, &mut signals, "hasAbyssShriek");
        assert_eq!(store.get_int(keys::SCREAM_LEVEL), 2);
        set_item_flag(&mut store, &mut signals, "hasHowlingWraiths");
        assert_eq!(store.get_int(keys::SCREAM_LEVEL), 2);
    }

    #[test]
    fn acid_armour_broadcasts() {
        let mut store = MemoryStore::new();
        let mut signals: Vec<Signal> = Vec::new();
        set_item_flag(&mut store, &mut signals, "hasAcidArmour");
        assert_eq!(signals, vec![Signal::GetAcidArmour]);
    }

    #[test]
    fn notches_awarded_once_per_threshold() {
        let mut store = MemoryStore::new_game();
        store.set_int(keys::CHARMS_OWNED, 10);
        assert_eq!(award_charm_notches(&mut store), 2);
        assert_eq!(award_charm_notches(&mut store), 0);
        assert_eq!(store.get_int(keys::CHARM_SLOTS), 5);
        assert!(store.get_bool("salubraNotch2"));
        assert!(!store.get_bool("salubraNotch3"));
    }

    #[test]
    fn extra_notch_clears_overcharm() {
        let mut store = MemoryStore::new_game();
        store.set_int(keys::CHARM_SLOTS_FILLED, 4);
        refresh_overcharm(&mut store);
        assert!(store.get_bool(keys::OVERCHARMED));

        store.set_int(keys::CHARMS_OWNED, 5);
        award_charm_notches(&mut store);
        assert!(!store.get_bool(keys::OVERCHARMED));
    }
}
