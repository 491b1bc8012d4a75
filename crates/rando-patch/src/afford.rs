//! Affordability checks for gated pickups.

use rando_types::{CostKind, CostSpec, ProgressStore, SceneName, keys};
use tracing::{debug, warn};

use crate::ports::SceneHost;

/// Child object whose activity marks a completed dream-plant trial.
pub const DREAM_DIALOGUE_CHILD: &str = "Dream Dialogue";

/// Whether the player can pay `cost` right now.
///
/// Each kind reads one counter or flag. A zero amount is always affordable.
/// World-flag gates whose near object is missing fail open.
pub fn is_affordable(
    cost: &CostSpec,
    store: &dyn ProgressStore,
    host: &dyn SceneHost,
    scene: &SceneName,
) -> bool {
    if cost.is_free() {
        return true;
    }
    let amount = i64::from(cost.amount);
    let have = |key: &str| i64::from(store.get_int(key));

    match cost.kind {
        CostKind::Currency => have(keys::GEO) >= amount,
        CostKind::Essence => have(keys::DREAM_ORBS) >= amount,
        CostKind::SimpleKey => {
            let held_back = i64::from(!store.get_bool(keys::OPENED_WATERWAYS_MANHOLE));
            have(keys::SIMPLE_KEYS) >= amount.saturating_add(held_back)
        }
        CostKind::GrubCount => have(keys::GRUBS_COLLECTED) >= amount,
        CostKind::ScreamLevel => have(keys::SCREAM_LEVEL) >= amount,
        CostKind::DreamNailFlag => store.get_bool(keys::HAS_DREAM_NAIL),
        CostKind::WorldFlag => world_flag_set(cost, host, scene),
    }
}

fn world_flag_set(cost: &CostSpec, host: &dyn SceneHost, scene: &SceneName) -> bool {
    let Some(near) = cost.near_object.as_ref() else {
        warn!(scene = %scene, "World-flag gate has no near object, unlocking");
        return true;
    };
    if !host.object_exists(scene, near) {
        warn!(
            scene = %scene,
            object = %near,
            "Near object for world-flag gate not found, unlocking"
        );
        return true;
    }
    match host.child_active(scene, near, DREAM_DIALOGUE_CHILD) {
        Some(active) => active,
        None => {
            debug!(scene = %scene, object = %near, "No dream dialogue child, unlocking");
            true
        }
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use rando_fsm::Fsm;
    use rando_types::{MemoryStore, ObjectName};

    use super::*;
    use crate::ports::Position;

    /// Scene with one dream plant whose dialogue child may be active.
    struct PlantScene {
        plant: Option<bool>,
    }

    impl SceneHost for PlantScene {
        fn object_exists(&self, _scene: &SceneName, object: &ObjectName) -> bool {
            object.as_str() == "Dream Plant" && self.plant.is_some()
        }

        fn object_position(&self, _scene: &SceneName, _object: &ObjectName) -> Option<Position> {
            None
        }

        fn child_active(&self, _scene: &SceneName, _object: &ObjectName, _child: &str) -> Option<bool> {
            self.plant
        }

        fn template_fsm(&self) -> Option<Fsm> {
            None
        }

        fn place_pickup(&mut self, _scene: &SceneName, _name: &ObjectName, _at: Position, _fsm: Fsm) {}
    }

    fn scene() -> SceneName {
        SceneName::from("RestingGrounds_05")
    }

    #[test]
    fn essence_below_amount_is_unaffordable() {
        let mut store = MemoryStore::new();
        let host = PlantScene { plant: None };
        let cost = CostSpec::new(CostKind::Essence, 7, "X");

        store.set_int(keys::DREAM_ORBS, 3);
        assert!(!is_affordable(&cost, &store, &host, &scene()));
        store.set_int(keys::DREAM_ORBS, 7);
        assert!(is_affordable(&cost, &store, &host, &scene()));
    }

    #[test]
    fn counter_costs_unlock_at_exactly_the_amount() {
        let host = PlantScene { plant: None };
        let cases = [
            (CostKind::Currency, keys::GEO, 150),
            (CostKind::GrubCount, keys::GRUBS_COLLECTED, 23),
            (CostKind::ScreamLevel, keys::SCREAM_LEVEL, 2),
        ];
        for (kind, key, amount) in cases {
            let cost = CostSpec::new(kind, i64::from(amount), "Cost");
            let mut store = MemoryStore::new();

            store.set_int(key, amount - 1);
            assert!(
                !is_affordable(&cost, &store, &host, &scene()),
                "{kind:?} at {} should be short",
                amount - 1
            );
            store.set_int(key, amount);
            assert!(
                is_affordable(&cost, &store, &host, &scene()),
                "{kind:?} at {amount} should unlock"
            );
        }
    }

    #[test]
    fn zero_amount_is_always_affordable() {
        let store = MemoryStore::new();
        let host = PlantScene { plant: None };
        let cost = CostSpec::new(CostKind::GrubCount, -3, "Grubs");
        assert!(is_affordable(&cost, &store, &host, &scene()));
    }

    #[test]
    fn simple_key_holds_one_back_until_manhole_opens() {
        let mut store = MemoryStore::new();
        let host = PlantScene { plant: None };
        let cost = CostSpec::new(CostKind::SimpleKey, 1, "Key");

        store.set_int(keys::SIMPLE_KEYS, 1);
        assert!(!is_affordable(&cost, &store, &host, &scene()));
        store.set_bool(keys::OPENED_WATERWAYS_MANHOLE, true);
        assert!(is_affordable(&cost, &store, &host, &scene()));
    }

    #[test]
    fn dream_nail_flag_is_checked() {
        let mut store = MemoryStore::new();
        let host = PlantScene { plant: None };
        let cost = CostSpec::new(CostKind::DreamNailFlag, 1, "Dream Gate");
        assert!(!is_affordable(&cost, &store, &host, &scene()));
        store.set_bool(keys::HAS_DREAM_NAIL, true);
        assert!(is_affordable(&cost, &store, &host, &scene()));
    }

    #[test]
    fn world_flag_reads_dream_dialogue() {
        let store = MemoryStore::new();
        let cost = CostSpec::new(CostKind::WorldFlag, 1, "Trial")
            .with_near_object(ObjectName::from("Dream Plant"));

        let inactive = PlantScene { plant: Some(false) };
        assert!(!is_affordable(&cost, &store, &inactive, &scene()));
        let active = PlantScene { plant: Some(true) };
        assert!(is_affordable(&cost, &store, &active, &scene()));
    }

    #[test]
    fn world_flag_fails_open_without_near_object() {
        let store = MemoryStore::new();
        let cost = CostSpec::new(CostKind::WorldFlag, 1, "Trial")
            .with_near_object(ObjectName::from("Dream Plant"));
        let missing = PlantScene { plant: None };
        assert!(is_affordable(&cost, &store, &missing, &scene()));
    }
}
