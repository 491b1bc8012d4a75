//! The grant effect interpreter.
//!
//! [`GrantInterpreter::apply`] is the single entry point for rewarding the
//! player. Every grant first records one tracker entry and sets the item's
//! save flag, then dispatches on the closed [`GrantKind`] set. The
//! interpreter holds no mutable state of its own: everything it changes goes
//! through the handles in [`GrantContext`].

use rando_types::{
    Catalog, GrantEffect, GrantKind, ItemDef, ItemId, PersistentMarker, ProgressStore, SceneName,
    Signal, SignalSink, TrackerEntryId, Trinket, keys,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::companions::{award_charm_notches, refresh_overcharm, set_item_flag};
use crate::error::GrantError;
use crate::staged::{MASK_SHARD, VESSEL_FRAGMENT, kingsoul_step};
use crate::tracker::TrackerLog;

/// Scenes holding a flamebearer spawn marker cleared by Grimmchild.
const FLAMEBEARER_SCENES: [&str; 6] = [
    "Mines_10",
    "Ruins1_28",
    "Fungus1_10",
    "Tutorial_01",
    "RestingGrounds_06",
    "Deepnest_East_03",
];

/// Quest flags set by Grimmchild, skipping the first two flame quests.
const GRIMMCHILD_FLAGS: [&str; 7] = [
    "nightmareLanternAppeared",
    "nightmareLanternLit",
    "troupeInTown",
    "divineInTown",
    "metGrimm",
    "killedFlameBearerSmall",
    "killedFlameBearerMed",
];

/// Quest counters set by Grimmchild.
const GRIMMCHILD_COUNTERS: [(&str, i32); 5] = [
    ("flamesRequired", 3),
    ("flamesCollected", 3),
    ("killsFlameBearerSmall", 3),
    ("killsFlameBearerMed", 3),
    ("grimmChildLevel", 2),
];

/// Interpreter toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantOptions {
    /// Award free notches at 5/10/18/25 charms owned.
    pub charm_notches: bool,
}

/// Handles the interpreter mutates during one grant.
pub struct GrantContext<'a> {
    /// Persistent progress data.
    pub store: &'a mut dyn ProgressStore,
    /// Item tracker.
    pub tracker: &'a mut dyn TrackerLog,
    /// Broadcast signal sink.
    pub signals: &'a mut dyn SignalSink,
}

/// Applies grant effects against a read-only catalog.
#[derive(Debug, Clone, Copy)]
pub struct GrantInterpreter<'c> {
    catalog: &'c Catalog,
    options: GrantOptions,
}

impl<'c> GrantInterpreter<'c> {
    /// Create an interpreter over `catalog`.
    pub const fn new(catalog: &'c Catalog, options: GrantOptions) -> Self {
        Self { catalog, options }
    }

    /// Apply one grant.
    ///
    /// The tracker entry and save flag are written before dispatch, so they
    /// are present even when the effect itself fails.
    ///
    /// # Errors
    ///
    /// Returns [`GrantError`] if the effect needs catalog data that is
    /// missing. Earlier writes of the same call are kept.
    pub fn apply(
        &self,
        effect: &GrantEffect,
        ctx: &mut GrantContext<'_>,
    ) -> Result<TrackerEntryId, GrantError> {
        let entry = ctx.tracker.record(&effect.item, &effect.location);
        ctx.store.mark_obtained(&effect.item);

        self.dispatch(effect, ctx)?;

        info!(
            item = %effect.item,
            location = %effect.location,
            kind = %effect.kind,
            "Grant applied"
        );
        Ok(entry)
    }

    fn dispatch(&self, effect: &GrantEffect, ctx: &mut GrantContext<'_>) -> Result<(), GrantError> {
        let item = &effect.item;
        match effect.kind {
            GrantKind::SetFlag | GrantKind::GrantStagBenefit => {
                let flag = required(item, "bool_name", self.def(item)?.bool_name.as_deref())?;
                set_item_flag(ctx.store, ctx.signals, flag);
            }
            GrantKind::IncrementCounter => {
                let counter = required(item, "int_name", self.def(item)?.int_name.as_deref())?;
                ctx.store.increment_int(counter);
            }
            GrantKind::EquipCharmAndIncrement => self.give_charm(item, ctx)?,
            GrantKind::AdditiveSequenceStep => self.additive_step(item, ctx)?,
            GrantKind::AddCurrency => {
                let amount = self.amount(effect)?;
                ctx.store.add_int(keys::GEO, amount);
            }
            GrantKind::GrantMapAccess => {
                let flag = required(item, "bool_name", self.def(item)?.bool_name.as_deref())?;
                ctx.store.set_bool(keys::HAS_MAP, true);
                ctx.store.set_bool(keys::OPENED_MAPPER_SHOP, true);
                ctx.store.set_bool(flag, true);
            }
            GrantKind::CollectGrub => {
                ctx.store.increment_int(keys::GRUBS_COLLECTED);
                ctx.signals.broadcast(Signal::GrubCry);
            }
            GrantKind::CollectEssence => {
                let amount = self.amount(effect)?;
                ctx.store.add_int(keys::DREAM_ORBS, amount);
                ctx.signals.broadcast(Signal::DreamOrbCollect);
            }
            GrantKind::MaskShardStep => {
                MASK_SHARD.advance(ctx.store, ctx.signals);
            }
            GrantKind::VesselFragmentStep => {
                VESSEL_FRAGMENT.advance(ctx.store, ctx.signals);
            }
            GrantKind::TrinketStep(trinket) => give_trinket(trinket, ctx.store),
            GrantKind::DreamerDefeat => self.defeat_dreamer(item, ctx.store)?,
            GrantKind::KingsoulStep => {
                kingsoul_step(ctx.store);
            }
            GrantKind::GrimmchildUnlock => unlock_grimmchild(ctx.store),
            GrantKind::NoOp => {}
        }
        Ok(())
    }

    fn def(&self, item: &ItemId) -> Result<&'c ItemDef, GrantError> {
        self.catalog
            .item(item)
            .ok_or_else(|| GrantError::UnknownItem(item.clone()))
    }

    /// Numeric override if present, otherwise the catalog amount.
    fn amount(&self, effect: &GrantEffect) -> Result<i32, GrantError> {
        let raw = match effect.param {
            Some(param) => param,
            None => i64::from(self.def(&effect.item)?.amount),
        };
        Ok(i32::try_from(raw.max(0)).unwrap_or(i32::MAX))
    }

    fn give_charm(&self, item: &ItemId, ctx: &mut GrantContext<'_>) -> Result<(), GrantError> {
        let def = self.def(item)?;
        let flag = required(item, "bool_name", def.bool_name.as_deref())?;

        ctx.store.set_bool(keys::HAS_CHARM, true);
        set_item_flag(ctx.store, ctx.signals, flag);
        ctx.store.increment_int(keys::CHARMS_OWNED);

        if let Some(equip) = def.equip_bool_name.as_deref() {
            ctx.store.set_bool(equip, true);
            let cost = i32::try_from(def.notch_cost).unwrap_or(i32::MAX);
            ctx.store.add_int(keys::CHARM_SLOTS_FILLED, cost);
            refresh_overcharm(ctx.store);
            debug!(item = %item, notch_cost = cost, "Charm granted equipped");
        }

        if self.options.charm_notches {
            award_charm_notches(ctx.store);
        }
        Ok(())
    }

    fn additive_step(&self, item: &ItemId, ctx: &mut GrantContext<'_>) -> Result<(), GrantError> {
        let family = self
            .catalog
            .additive_family_of(item)
            .ok_or_else(|| GrantError::NotInFamily(item.clone()))?;

        let owned = family
            .iter()
            .filter(|member| *member != item && ctx.store.is_obtained(member))
            .count();
        let index = owned.min(family.len().saturating_sub(1));
        let member = family
            .get(index)
            .ok_or_else(|| GrantError::NotInFamily(item.clone()))?;

        let flag = required(member, "bool_name", self.def(member)?.bool_name.as_deref())?;
        set_item_flag(ctx.store, ctx.signals, flag);
        debug!(item = %item, member = %member, index, "Additive step");
        Ok(())
    }

    fn defeat_dreamer(&self, item: &ItemId, store: &mut dyn ProgressStore) -> Result<(), GrantError> {
        let def = self.def(item)?;
        let defeated = required(item, "bool_name", def.bool_name.as_deref())?;
        store.set_bool(defeated, true);
        if let Some(mask) = def.secondary_bool.as_deref() {
            store.set_bool(mask, true);
        }
        let defeated_count = store.increment_int(keys::GUARDIANS_DEFEATED);

        // Fires on the defeat that takes `guardiansDefeated` to 1. The flag
        // keeps it one-shot even if the counter is later rewritten.
        if !store.get_bool(keys::DREAMER_BOOTSTRAP_DONE) {
            store.set_bool(keys::DREAMER_BOOTSTRAP_DONE, true);
            store.set_bool(keys::HORNET_FOUNTAIN_ENCOUNTER, true);
            store.set_bool(keys::MARM_OUTSIDE, true);
            store.set_bool(keys::CROSSROADS_INFECTED, true);
            info!(item = %item, defeated_count, "First dreamer defeated, world advanced");
        }
        Ok(())
    }
}

fn required<'a>(item: &ItemId, field: &'static str, value: Option<&'a str>) -> Result<&'a str, GrantError> {
    value.ok_or_else(|| GrantError::MissingField {
        item: item.clone(),
        field,
    })
}

fn give_trinket(trinket: Trinket, store: &mut dyn ProgressStore) {
    store.set_bool(trinket.found_flag(), true);
    store.increment_int(trinket.counter());
}

fn unlock_grimmchild(store: &mut dyn ProgressStore) {
    store.set_bool("gotCharm_40", true);
    for flag in GRIMMCHILD_FLAGS {
        store.set_bool(flag, true);
    }
    for (counter, value) in GRIMMCHILD_COUNTERS {
        store.set_int(counter, value);
    }
    for scene in FLAMEBEARER_SCENES {
        store.save_marker(PersistentMarker {
            scene: SceneName::from(scene),
            id: String::from("Flamebearer Spawn"),
            activated: true,
            semi_persistent: false,
        });
    }
}
