//! Settings consumed by the sampler.
//!
//! Deserialized as the `randomization` section of `rando-config.yaml`.
//! Every field has a default, so an empty section is valid.

use std::collections::BTreeSet;

use rando_types::{ItemPool, RandomizationMode};
use serde::{Deserialize, Serialize};

/// Randomization settings that shape the pre-placement samples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerSettings {
    /// Pools whose items are shuffled. Costs are only re-rolled for these.
    #[serde(default = "default_randomized_pools")]
    pub randomized_pools: BTreeSet<ItemPool>,

    /// Transition randomizer granularity.
    #[serde(default)]
    pub mode: RandomizationMode,

    /// Grant a random starting loadout.
    #[serde(default)]
    pub randomize_start_items: bool,

    /// Pick a random safe start instead of `start_name`.
    #[serde(default)]
    pub randomize_start_location: bool,

    /// Configured start when start randomization is off.
    #[serde(default = "default_start_name")]
    pub start_name: String,

    /// Largest sampled essence cost.
    #[serde(default = "default_max_essence_cost")]
    pub max_essence_cost: u32,

    /// Largest sampled grub cost.
    #[serde(default = "default_max_grub_cost")]
    pub max_grub_cost: u32,
}

impl SamplerSettings {
    /// Whether items of `pool` are shuffled.
    pub fn is_randomized(&self, pool: ItemPool) -> bool {
        self.randomized_pools.contains(&pool)
    }
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            randomized_pools: default_randomized_pools(),
            mode: RandomizationMode::default(),
            randomize_start_items: false,
            randomize_start_location: false,
            start_name: default_start_name(),
            max_essence_cost: default_max_essence_cost(),
            max_grub_cost: default_max_grub_cost(),
        }
    }
}

fn default_randomized_pools() -> BTreeSet<ItemPool> {
    [
        ItemPool::Dreamer,
        ItemPool::Skill,
        ItemPool::Charm,
        ItemPool::Key,
    ]
    .into_iter()
    .collect()
}

fn default_start_name() -> String {
    String::from(crate::start::DEFAULT_START)
}

const fn default_max_essence_cost() -> u32 {
    900
}

const fn default_max_grub_cost() -> u32 {
    23
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_uses_defaults() {
        let settings: SamplerSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, SamplerSettings::default());
        assert_eq!(settings.max_essence_cost, 900);
        assert_eq!(settings.max_grub_cost, 23);
        assert_eq!(settings.start_name, "King's Pass");
    }

    #[test]
    fn pool_membership() {
        let settings = SamplerSettings::default();
        assert!(settings.is_randomized(ItemPool::Charm));
        assert!(!settings.is_randomized(ItemPool::Grub));
    }
}
