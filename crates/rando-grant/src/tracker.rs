//! The item tracker: an append-only log of collected rewards.
//!
//! Every grant appends exactly one entry, before its effect is dispatched.
//! Entries are never modified or removed during a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use rando_types::{ItemId, LocationId, TrackerEntryId};

/// One collected reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerEntry {
    /// Unique entry identifier.
    pub id: TrackerEntryId,
    /// The item collected.
    pub item: ItemId,
    /// Where it was collected.
    pub location: LocationId,
    /// Wall-clock time of collection.
    pub recorded_at: DateTime<Utc>,
}

/// Sink for tracker entries.
pub trait TrackerLog {
    /// Append an entry for `(item, location)` and return its id.
    fn record(&mut self, item: &ItemId, location: &LocationId) -> TrackerEntryId;
}

/// In-memory [`TrackerLog`].
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MemoryTracker {
    /// All entries, in insertion order.
    entries: Vec<TrackerEntry>,
}

impl MemoryTracker {
    /// Create an empty tracker.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Return the number of entries.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether nothing has been recorded.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[TrackerEntry] {
        &self.entries
    }

    /// Number of entries recorded for `item`.
    pub fn count_for(&self, item: &ItemId) -> usize {
        self.entries.iter().filter(|e| &e.item == item).count()
    }
}

impl TrackerLog for MemoryTracker {
    fn record(&mut self, item: &ItemId, location: &LocationId) -> TrackerEntryId {
        let entry = TrackerEntry {
            id: TrackerEntryId::new(),
            item: item.clone(),
            location: location.clone(),
            recorded_at: Utc::now(),
        };
        let id = entry.id;
        debug!(item = %item, location = %location, entry_id = %id, "Tracker entry recorded");
        self.entries.push(entry);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_appended_in_order() {
        let mut tracker = MemoryTracker::new();
        let a = tracker.record(&ItemId::from("Mantis_Claw"), &LocationId::from("Mantis_Outskirts"));
        let b = tracker.record(&ItemId::from("Grub"), &LocationId::from("Crossroads_Grub"));
        assert_ne!(a, b);
        assert_eq!(tracker.len(), 2);
        assert_eq!(
            tracker.entries().first().map(|e| e.item.as_str()),
            Some("Mantis_Claw")
        );
    }

    #[test]
    fn count_for_filters_by_item() {
        let mut tracker = MemoryTracker::new();
        let grub = ItemId::from("Grub");
        tracker.record(&grub, &LocationId::from("A"));
        tracker.record(&grub, &LocationId::from("B"));
        tracker.record(&ItemId::from("Geo"), &LocationId::from("C"));
        assert_eq!(tracker.count_for(&grub), 2);
    }

    #[test]
    fn entries_serialize() {
        let mut tracker = MemoryTracker::new();
        tracker.record(&ItemId::from("Lurien"), &LocationId::from("Dreamer_Lurien"));
        let json = serde_json::to_string(&tracker).unwrap_or_default();
        assert!(json.contains("Dreamer_Lurien"));
    }
}
