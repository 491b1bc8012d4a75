//! Cost re-rolls for essence and grub gates.

use std::collections::BTreeMap;

use rand::Rng;
use rando_types::{Catalog, CostKind, CostSpec, ItemDef, ItemId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::settings::SamplerSettings;

/// Sampled gate amounts, keyed by item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostTable {
    amounts: BTreeMap<ItemId, u32>,
}

impl CostTable {
    /// The sampled amount for `item`, if it was re-rolled.
    pub fn get(&self, item: &ItemId) -> Option<u32> {
        self.amounts.get(item).copied()
    }

    /// Number of re-rolled costs.
    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    /// Whether nothing was re-rolled.
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Iterate over `(item, amount)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, u32)> {
        self.amounts.iter().map(|(id, amount)| (id, *amount))
    }

    /// Build the gate cost for `def`: the sampled amount when there is one,
    /// otherwise the catalog amount. `None` when the item is not gated.
    pub fn cost_spec(&self, def: &ItemDef) -> Option<CostSpec> {
        let kind = def.cost_kind?;
        let amount = self.get(&def.name).map_or(def.cost, i64::from);
        Some(CostSpec::new(kind, amount, def.label.clone()))
    }
}

/// Re-roll `amount ~ U[1, max]` for every essence or grub gate whose item
/// pool is randomized.
pub fn sample_costs(catalog: &Catalog, settings: &SamplerSettings, rng: &mut impl Rng) -> CostTable {
    let mut table = CostTable::default();
    for def in catalog.items() {
        let Some(kind) = def.cost_kind else {
            continue;
        };
        if !kind.is_sampled() || !settings.is_randomized(def.pool) {
            continue;
        }
        let max = max_for(kind, settings);
        let amount = rng.random_range(1..=max);
        debug!(item = %def.name, kind = %kind, amount, "Cost sampled");
        table.amounts.insert(def.name.clone(), amount);
    }
    table
}

fn max_for(kind: CostKind, settings: &SamplerSettings) -> u32 {
    let configured = if kind == CostKind::Essence {
        settings.max_essence_cost
    } else {
        settings.max_grub_cost
    };
    if configured == 0 {
        warn!(kind = %kind, "Maximum sampled cost is 0, using 1");
        return 1;
    }
    configured
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rando_types::{GrantKind, ItemPool};

    use super::*;

    fn gated(name: &str, pool: ItemPool, kind: Option<CostKind>, cost: i64) -> ItemDef {
        ItemDef {
            name: ItemId::from(name),
            pool,
            kind: GrantKind::SetFlag,
            label: name.to_owned(),
            bool_name: None,
            secondary_bool: None,
            int_name: None,
            equip_bool_name: None,
            notch_cost: 0,
            amount: 0,
            cost_kind: kind,
            cost,
            progression: false,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(
            [
                gated("Dream_Wielder", ItemPool::Charm, Some(CostKind::Essence), 500),
                gated("Mask_Shard-Grubfather", ItemPool::MaskShard, Some(CostKind::GrubCount), 5),
                gated("Lumafly_Lantern", ItemPool::Key, Some(CostKind::Currency), 1800),
                gated("Pale_Ore-Grubs", ItemPool::Key, Some(CostKind::GrubCount), 31),
                gated("Vengeful_Spirit", ItemPool::Skill, None, 0),
            ],
            [],
            [],
            BTreeMap::new(),
        )
    }

    #[test]
    fn only_randomized_essence_and_grub_costs_are_rolled() {
        let mut rng = StdRng::seed_from_u64(7);
        let table = sample_costs(&catalog(), &SamplerSettings::default(), &mut rng);

        assert_eq!(table.len(), 2);
        let essence = table.get(&ItemId::from("Dream_Wielder")).unwrap_or(0);
        assert!((1..=900).contains(&essence));
        let grubs = table.get(&ItemId::from("Pale_Ore-Grubs")).unwrap_or(0);
        assert!((1..=23).contains(&grubs));
        assert!(table.get(&ItemId::from("Mask_Shard-Grubfather")).is_none());
        assert!(table.get(&ItemId::from("Lumafly_Lantern")).is_none());
    }

    #[test]
    fn amounts_stay_within_configured_maxima() {
        let settings = SamplerSettings {
            max_essence_cost: 3,
            max_grub_cost: 1,
            ..SamplerSettings::default()
        };
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let table = sample_costs(&catalog(), &settings, &mut rng);
            for (_, amount) in table.iter() {
                assert!((1..=3).contains(&amount));
            }
            assert_eq!(table.get(&ItemId::from("Pale_Ore-Grubs")), Some(1));
        }
    }

    #[test]
    fn zero_maximum_degrades_to_one() {
        let settings = SamplerSettings {
            max_essence_cost: 0,
            ..SamplerSettings::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let table = sample_costs(&catalog(), &settings, &mut rng);
        assert_eq!(table.get(&ItemId::from("Dream_Wielder")), Some(1));
    }

    #[test]
    fn cost_spec_prefers_sampled_amount() {
        let cat = catalog();
        let mut rng = StdRng::seed_from_u64(3);
        let table = sample_costs(&cat, &SamplerSettings::default(), &mut rng);

        let wielder = cat.item(&ItemId::from("Dream_Wielder")).and_then(|d| table.cost_spec(d));
        let sampled = table.get(&ItemId::from("Dream_Wielder"));
        assert_eq!(wielder.map(|c| c.amount), sampled);

        let lantern = cat.item(&ItemId::from("Lumafly_Lantern")).and_then(|d| table.cost_spec(d));
        assert_eq!(lantern.map(|c| c.amount), Some(1800));

        let spirit = cat.item(&ItemId::from("Vengeful_Spirit")).and_then(|d| table.cost_spec(d));
        assert!(spirit.is_none());
    }
}
