//! Declarative cost descriptions attached to gated pickups.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::enums::CostKind;
use crate::ids::ObjectName;

/// The resource and amount required to pass a gate.
///
/// Built once when rules are registered and never mutated afterwards. An
/// `amount` of zero means the gate is unconditionally affordable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostSpec {
    /// Which counter or flag the gate reads.
    pub kind: CostKind,
    /// Required amount. Never negative.
    pub amount: u32,
    /// Text shown in the confirmation prompt.
    pub display_text: String,
    /// Scene object inspected by [`CostKind::WorldFlag`] gates.
    #[serde(default)]
    pub near_object: Option<ObjectName>,
}

impl CostSpec {
    /// Build a cost from a possibly negative amount.
    ///
    /// Negative amounts are clamped to 0 with a warning rather than rejected.
    pub fn new(kind: CostKind, amount: i64, display_text: impl Into<String>) -> Self {
        let display_text = display_text.into();
        let clamped = if amount < 0 {
            warn!(
                kind = %kind,
                amount,
                display_text = %display_text,
                "Cost created with negative amount, clamping to 0"
            );
            0
        } else {
            u32::try_from(amount).unwrap_or(u32::MAX)
        };
        Self {
            kind,
            amount: clamped,
            display_text,
            near_object: None,
        }
    }

    /// Attach the scene object a world-flag gate inspects.
    #[must_use]
    pub fn with_near_object(mut self, object: ObjectName) -> Self {
        self.near_object = Some(object);
        self
    }

    /// Whether the gate is passable without checking any counter.
    pub const fn is_free(&self) -> bool {
        self.amount == 0
    }

    /// Prompt text for the given item label, e.g. `7 Essence: Dream Gate`.
    pub fn prompt_text(&self, item_label: &str) -> String {
        match self.kind {
            CostKind::Currency => format!("{} Geo: {item_label}", self.amount),
            CostKind::Essence => format!("{} Essence: {item_label}", self.amount),
            CostKind::SimpleKey => format!("{} Simple Key: {item_label}", self.amount),
            CostKind::GrubCount => format!("{} Grubs: {item_label}", self.amount),
            CostKind::ScreamLevel => format!("Have Howling Wraiths: {item_label}"),
            CostKind::DreamNailFlag => format!("Have Dream Nail: {item_label}"),
            CostKind::WorldFlag => format!("Complete the trial: {item_label}"),
        }
    }
}
