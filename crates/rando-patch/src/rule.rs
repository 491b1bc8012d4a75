//! Patch rules: which object gets which patch.

use rando_types::{FsmName, ObjectName, SceneName};
use serde::{Deserialize, Serialize};

use crate::gate::GatePatch;
use crate::rewire::RewirePatch;
use crate::spawn::SpawnPatch;

/// How a rule matches object names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectMatch {
    /// The object name must be equal.
    Exact(ObjectName),
    /// The object name must start with the prefix (numbered clones).
    Prefix(String),
}

impl ObjectMatch {
    /// Whether `object` matches.
    pub fn matches(&self, object: &ObjectName) -> bool {
        match self {
            Self::Exact(name) => name == object,
            Self::Prefix(prefix) => object.as_str().starts_with(prefix.as_str()),
        }
    }
}

/// The `(scene, object, fsm)` a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PatchTarget {
    /// Scene; `None` matches every scene.
    pub scene: Option<SceneName>,
    /// Object matcher.
    pub object: ObjectMatch,
    /// FSM name on the object.
    pub fsm: FsmName,
}

impl PatchTarget {
    /// Target one named object in one scene.
    pub fn exact(scene: SceneName, object: ObjectName, fsm: FsmName) -> Self {
        Self {
            scene: Some(scene),
            object: ObjectMatch::Exact(object),
            fsm,
        }
    }

    /// Target every object whose name starts with `prefix`, in any scene.
    pub fn prefix_anywhere(prefix: &str, fsm: FsmName) -> Self {
        Self {
            scene: None,
            object: ObjectMatch::Prefix(prefix.to_owned()),
            fsm,
        }
    }

    /// Whether a created `(scene, object, fsm)` is targeted.
    pub fn matches(&self, scene: &SceneName, object: &ObjectName, fsm: &FsmName) -> bool {
        self.scene.as_ref().is_none_or(|s| s == scene) && &self.fsm == fsm && self.object.matches(object)
    }
}

impl core::fmt::Display for PatchTarget {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let scene = self.scene.as_ref().map_or("*", SceneName::as_str);
        match &self.object {
            ObjectMatch::Exact(name) => write!(f, "{scene}/{name}/{}", self.fsm),
            ObjectMatch::Prefix(prefix) => write!(f, "{scene}/{prefix}*/{}", self.fsm),
        }
    }
}

/// The edit a rule performs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PatchKind {
    /// Insert a cost-gated prompt.
    Gate(GatePatch),
    /// Place a new pickup when the scene loads.
    Spawn(SpawnPatch),
    /// Rewire existing transitions.
    Rewire(RewirePatch),
}

impl PatchKind {
    /// Short label used in logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Gate(_) => "gate",
            Self::Spawn(_) => "spawn",
            Self::Rewire(_) => "rewire",
        }
    }
}

/// A registered patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRule {
    /// What the rule applies to.
    pub target: PatchTarget,
    /// What it does.
    pub kind: PatchKind,
}

/// Result of applying one rule to one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchOutcome {
    /// The edit was made.
    Applied,
    /// The sentinel was present; nothing changed.
    AlreadyApplied,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rando_types::{CostKind, CostSpec, ItemId};

    use super::*;

    #[test]
    fn prefix_target_matches_numbered_clones_anywhere() {
        let target = PatchTarget::prefix_anywhere("Shade Sibling", FsmName::from("Control"));
        assert!(target.matches(
            &SceneName::from("Abyss_15"),
            &ObjectName::from("Shade Sibling (14)"),
            &FsmName::from("Control"),
        ));
        assert!(!target.matches(
            &SceneName::from("Abyss_15"),
            &ObjectName::from("Shade Sibling (14)"),
            &FsmName::from("Shade Control"),
        ));
    }

    #[test]
    fn exact_target_checks_scene() {
        let target = PatchTarget::exact(
            SceneName::from("RestingGrounds_07"),
            ObjectName::from("Shiny_12"),
            FsmName::from("Shiny Control"),
        );
        assert!(!target.matches(
            &SceneName::from("Town"),
            &ObjectName::from("Shiny_12"),
            &FsmName::from("Shiny Control"),
        ));
        assert_eq!(target.to_string(), "RestingGrounds_07/Shiny_12/Shiny Control");
    }

    #[test]
    fn gate_rule_survives_json() {
        let rule = PatchRule {
            target: PatchTarget::exact(
                SceneName::from("RestingGrounds_07"),
                ObjectName::from("Shiny_12"),
                FsmName::from("Shiny Control"),
            ),
            kind: PatchKind::Gate(GatePatch {
                requester: ObjectName::from("Shiny_12"),
                item: ItemId::from("Mask_Shard-Seer"),
                cost: CostSpec::new(CostKind::Essence, 300, "Essence"),
            }),
        };
        let json = serde_json::to_string(&rule).unwrap();
        let back: PatchRule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
        assert_eq!(back.kind.label(), "gate");
    }
}
