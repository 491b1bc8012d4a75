//! New-run setup applied once, before the player moves.

use rando_grant::{GrantContext, GrantInterpreter};
use rando_sampler::StartingLoadout;
use rando_types::{Catalog, GrantEffect, LocationId, ProgressStore, keys};
use tracing::{info, warn};

use crate::config::QualityOfLifeConfig;

/// Location recorded for items granted at the start of a run.
pub const START_LOCATION: &str = "Start";

/// Geo added by the early-geo toggle.
pub const EARLY_GEO: i32 = 300;

/// Encounter flags that shorten boss intros.
const FAST_BOSS_INTROS: [&str; 5] = [
    "unchainedHollowKnight",
    "encounteredMimicSpider",
    "infectedKnightEncountered",
    "mageLordEncountered",
    "mageLordEncountered_2",
];

/// Apply the new-run bonuses.
pub fn apply_new_run_bonuses(store: &mut dyn ProgressStore, qol: &QualityOfLifeConfig) {
    // Suppresses the charm tutorial popup.
    store.set_bool(keys::HAS_CHARM, true);
    for flag in FAST_BOSS_INTROS {
        store.set_bool(flag, true);
    }
    if qol.free_lantern {
        store.set_bool("hasLantern", true);
    }
    if qol.early_geo {
        store.add_int(keys::GEO, EARLY_GEO);
    }
    info!(
        free_lantern = qol.free_lantern,
        early_geo = qol.early_geo,
        "New-run bonuses applied"
    );
}

/// Grant every loadout item at [`START_LOCATION`].
///
/// Items missing from the catalog, or whose grant fails, are logged and
/// skipped. Returns the number of items granted.
pub fn grant_loadout(
    catalog: &Catalog,
    interpreter: &GrantInterpreter<'_>,
    loadout: &StartingLoadout,
    ctx: &mut GrantContext<'_>,
) -> usize {
    let start = LocationId::from(START_LOCATION);
    let mut granted: usize = 0;
    for item in &loadout.items {
        let Some(def) = catalog.item(item) else {
            warn!(item = %item, "Loadout item not in catalog");
            continue;
        };
        let effect = GrantEffect::new(def.kind, item.clone(), start.clone());
        match interpreter.apply(&effect, ctx) {
            Ok(_) => granted = granted.saturating_add(1),
            Err(e) => warn!(item = %item, error = %e, "Loadout grant failed"),
        }
    }
    info!(granted, total = loadout.items.len(), "Starting loadout granted");
    granted
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rando_grant::{GrantOptions, MemoryTracker};
    use rando_types::{ItemId, MemoryStore, Signal};

    use super::*;
    use crate::catalog::{DEFAULT_CATALOG, parse_catalog};

    #[test]
    fn bonuses_follow_toggles() {
        let mut store = MemoryStore::new_game();
        let qol = QualityOfLifeConfig {
            charm_notches: true,
            free_lantern: true,
            early_geo: true,
        };
        apply_new_run_bonuses(&mut store, &qol);
        assert!(store.get_bool(keys::HAS_CHARM));
        assert!(store.get_bool("mageLordEncountered_2"));
        assert!(store.get_bool("hasLantern"));
        assert_eq!(store.get_int(keys::GEO), 300);

        let mut plain = MemoryStore::new_game();
        apply_new_run_bonuses(&mut plain, &QualityOfLifeConfig::default());
        assert!(!plain.get_bool("hasLantern"));
        assert_eq!(plain.get_int(keys::GEO), 0);
    }

    #[test]
    fn loadout_is_granted_at_start() {
        let catalog = parse_catalog(DEFAULT_CATALOG).unwrap();
        let interpreter = GrantInterpreter::new(&catalog, GrantOptions::default());
        let mut store = MemoryStore::new_game();
        let mut tracker = MemoryTracker::new();
        let mut signals: Vec<Signal> = Vec::new();
        let loadout = StartingLoadout {
            items: vec![
                ItemId::from("Mantis_Claw"),
                ItemId::from("Mothwing_Cloak"),
                ItemId::from("Not_An_Item"),
            ],
            progression: Vec::new(),
        };

        let mut ctx = GrantContext {
            store: &mut store,
            tracker: &mut tracker,
            signals: &mut signals,
        };
        let granted = grant_loadout(&catalog, &interpreter, &loadout, &mut ctx);

        assert_eq!(granted, 2);
        assert!(store.get_bool("hasWalljump"));
        assert!(store.get_bool("canWallJump"));
        assert!(store.get_bool("hasDash"));
        assert_eq!(tracker.len(), 2);
        assert!(
            tracker
                .entries()
                .iter()
                .all(|e| e.location.as_str() == START_LOCATION)
        );
    }
}
