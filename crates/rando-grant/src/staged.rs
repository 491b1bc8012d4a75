//! Staged counters: rewards that pay out only after several grants.
//!
//! Mask shards and vessel fragments share one shape. A grant advances the
//! progress counter, saturating at its bound. On reaching the bound the
//! capacity grows and the counter resets, unless capacity is already at its
//! cap, in which case the increase is suppressed and the counter holds. The
//! grant that raises capacity onto its cap also leaves the counter at the
//! bound.
//!
//! Kingsoul is a plain four-stage sequence with one skipped stage.

use rando_types::{ProgressStore, Signal, SignalSink, keys};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Shape of a capacity-raising staged counter.
#[derive(Debug, Clone, Copy)]
pub struct StagedCounter {
    /// Counter advanced by each grant.
    pub progress_key: &'static str,
    /// Flag set by every grant.
    pub collected_flag: &'static str,
    /// Grants needed to raise capacity.
    pub bound: i32,
    /// Capacity counter raised on completion.
    pub capacity_key: &'static str,
    /// Upper bound on `capacity_key`.
    pub cap_key: &'static str,
    /// Amount added to capacity.
    pub increase: i32,
    /// Extra counters raised with capacity (current maximum, current value).
    pub mirrors: &'static [&'static str],
    /// Signals broadcast when capacity grows.
    pub signals: &'static [Signal],
}

/// Mask shards: three shards add one mask.
pub const MASK_SHARD: StagedCounter = StagedCounter {
    progress_key: keys::HEART_PIECES,
    collected_flag: keys::HEART_PIECE_COLLECTED,
    bound: 3,
    capacity_key: keys::MAX_HEALTH_BASE,
    cap_key: keys::MAX_HEALTH_CAP,
    increase: 1,
    mirrors: &[keys::MAX_HEALTH],
    signals: &[Signal::MaxHpUp, Signal::HeroHealedFull],
};

/// Vessel fragments: two fragments add one soul vessel.
pub const VESSEL_FRAGMENT: StagedCounter = StagedCounter {
    progress_key: keys::VESSEL_FRAGMENTS,
    collected_flag: keys::VESSEL_FRAGMENT_COLLECTED,
    bound: 2,
    capacity_key: keys::MP_RESERVE_MAX,
    cap_key: keys::MP_RESERVE_CAP,
    increase: 33,
    mirrors: &[],
    signals: &[Signal::NewSoulOrb],
};

/// Result of one staged-counter grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageOutcome {
    /// Progress advanced to the given value.
    Advanced(i32),
    /// Capacity grew to the given value. Progress reset unless the new
    /// value reached the cap.
    CapacityIncreased(i32),
    /// Capacity is at its cap; progress held at the bound.
    Suppressed,
}

impl StagedCounter {
    /// Apply one grant.
    pub fn advance(&self, store: &mut dyn ProgressStore, signals: &mut dyn SignalSink) -> StageOutcome {
        store.set_bool(self.collected_flag, true);

        let progress = store
            .get_int(self.progress_key)
            .saturating_add(1)
            .min(self.bound);
        store.set_int(self.progress_key, progress);
        if progress < self.bound {
            debug!(counter = self.progress_key, progress, "Staged counter advanced");
            return StageOutcome::Advanced(progress);
        }

        let capacity = store.get_int(self.capacity_key);
        let cap = store.get_int(self.cap_key);
        if capacity >= cap {
            info!(
                counter = self.progress_key,
                capacity,
                cap,
                "Capacity at cap, increase suppressed"
            );
            return StageOutcome::Suppressed;
        }

        let raised = capacity.saturating_add(self.increase).min(cap);
        store.set_int(self.capacity_key, raised);
        for mirror in self.mirrors {
            store.add_int(mirror, self.increase);
        }
        if self.signals.contains(&Signal::HeroHealedFull) {
            let max_health = store.get_int(keys::MAX_HEALTH);
            store.set_int(keys::HEALTH, max_health);
        }
        if raised < cap {
            store.set_int(self.progress_key, 0);
        }
        for signal in self.signals {
            signals.broadcast(*signal);
        }
        info!(counter = self.progress_key, capacity = raised, "Capacity increased");
        StageOutcome::CapacityIncreased(raised)
    }
}

/// Highest Kingsoul stage (Void Heart).
pub const KINGSOUL_FINAL_STAGE: i32 = 4;

/// Advance the Kingsoul / Void Heart stage and return the new stage.
///
/// Stage 1 grants Kingsoul, stage 2 is skipped straight to 3, stage 4 grants
/// Void Heart equipped at no notch cost. Grants at stage 4 hold there.
pub fn kingsoul_step(store: &mut dyn ProgressStore) -> i32 {
    let current = store.get_int(keys::ROYAL_CHARM_STATE);
    if current >= KINGSOUL_FINAL_STAGE {
        debug!(stage = current, "Kingsoul already final, holding");
        return KINGSOUL_FINAL_STAGE;
    }

    let mut stage = current.saturating_add(1).max(1);
    match stage {
        1 => store.set_bool(keys::GOT_CHARM_36, true),
        2 => stage = 3,
        KINGSOUL_FINAL_STAGE => {
            store.set_bool(keys::GOT_SHADE_CHARM, true);
            store.set_int(keys::CHARM_COST_36, 0);
            store.set_bool(keys::EQUIPPED_CHARM_36, true);
        }
        _ => {}
    }
    store.set_int(keys::ROYAL_CHARM_STATE, stage);
    debug!(stage, "Kingsoul stage advanced");
    stage
}
