//! Starting location selection.

use rand::Rng;
use rando_types::{Catalog, StartDef};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SamplerError;
use crate::loadout::take_random;
use crate::settings::SamplerSettings;

/// Start used when the configured one is not in the catalog.
pub const DEFAULT_START: &str = "King's Pass";

/// The chosen start and the progression it grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingLocation {
    /// Start name.
    pub name: String,
    /// Waypoints and transitions the start makes reachable.
    pub progression: Vec<String>,
}

/// Whether `start` can be used with the current settings.
///
/// A random loadout makes every start safe. Otherwise the strictest
/// shuffled granularity decides: rooms, then areas, then items only.
pub const fn is_safe_start(start: &StartDef, settings: &SamplerSettings) -> bool {
    if settings.randomize_start_items {
        return true;
    }
    if settings.mode.rooms() {
        return start.room_safe;
    }
    if settings.mode.areas() {
        return start.area_safe;
    }
    start.item_safe
}

/// Pick the starting location.
pub fn sample_starting_location(
    catalog: &Catalog,
    settings: &SamplerSettings,
    rng: &mut impl Rng,
) -> Result<StartingLocation, SamplerError> {
    let def = if settings.randomize_start_location {
        let mut safe: Vec<&StartDef> = catalog.starts().filter(|s| is_safe_start(s, settings)).collect();
        take_random(&mut safe, rng).ok_or(SamplerError::NoSafeStart)?
    } else if let Some(def) = catalog.start(&settings.start_name) {
        def
    } else {
        warn!(start = %settings.start_name, fallback = DEFAULT_START, "Configured start not in catalog");
        catalog
            .start(DEFAULT_START)
            .ok_or_else(|| SamplerError::UnknownStart(settings.start_name.clone()))?
    };

    let progression = start_progression(def, settings);
    info!(start = %def.name, progression = progression.len(), "Starting location chosen");
    Ok(StartingLocation {
        name: def.name.clone(),
        progression,
    })
}

/// Progression granted by standing at `def`.
fn start_progression(def: &StartDef, settings: &SamplerSettings) -> Vec<String> {
    let mut progression = Vec::new();
    let rooms = settings.mode.rooms();
    if !rooms {
        progression.push(def.waypoint.clone());
    }
    if settings.mode.areas()
        && let Some(area) = def.area_transition.as_ref().filter(|a| !a.is_empty())
    {
        progression.push(area.clone());
    }
    if rooms && let Some(room) = &def.room_transition {
        progression.push(room.clone());
    }
    progression
}
