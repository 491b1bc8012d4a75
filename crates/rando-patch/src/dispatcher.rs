//! The patch rule dispatcher.
//!
//! Object-creation events run every matching gate and rewire rule against
//! the new object's FSM; scene loads run the scene's spawn rules. Each of
//! the two rule families holds at most one rule per target, so a spawned
//! pickup can also carry a gate. A failing rule is logged at `warn` and
//! counted as skipped; it never stops the other rules.

use std::collections::BTreeMap;

use rando_fsm::Fsm;
use rando_types::{ObjectName, SceneName};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PatchError;
use crate::ports::SceneHost;
use crate::rule::{PatchKind, PatchOutcome, PatchRule, PatchTarget};
use crate::spawn::SpawnPatch;

/// Tally of one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    /// Rules that edited something.
    pub applied: u32,
    /// Rules whose sentinel was already present.
    pub already_applied: u32,
    /// Rules that failed and were skipped for this object.
    pub skipped: u32,
}

impl DispatchReport {
    /// Whether no rule matched.
    pub const fn is_empty(&self) -> bool {
        self.applied == 0 && self.already_applied == 0 && self.skipped == 0
    }

    fn record(&mut self, target: &PatchTarget, kind: &str, result: Result<PatchOutcome, PatchError>) {
        match result {
            Ok(PatchOutcome::Applied) => self.applied = self.applied.saturating_add(1),
            Ok(PatchOutcome::AlreadyApplied) => {
                self.already_applied = self.already_applied.saturating_add(1);
            }
            Err(error) => {
                warn!(
                    target = %target,
                    kind,
                    error = %error,
                    "Rule skipped for this object"
                );
                self.skipped = self.skipped.saturating_add(1);
            }
        }
    }
}

/// Registry of patch rules keyed by target.
#[derive(Debug, Clone, Default)]
pub struct PatchDispatcher {
    object_rules: BTreeMap<PatchTarget, PatchKind>,
    scene_rules: BTreeMap<PatchTarget, SpawnPatch>,
}

impl PatchDispatcher {
    /// Create an empty dispatcher.
    pub const fn new() -> Self {
        Self {
            object_rules: BTreeMap::new(),
            scene_rules: BTreeMap::new(),
        }
    }

    /// Register a rule, replacing any rule of the same family for the same
    /// target.
    ///
    /// Returns the replaced rule's kind, if there was one.
    pub fn register(&mut self, rule: PatchRule) -> Option<PatchKind> {
        let replaced = match rule.kind {
            PatchKind::Spawn(spawn) => self
                .scene_rules
                .insert(rule.target.clone(), spawn)
                .map(PatchKind::Spawn),
            kind => self.object_rules.insert(rule.target.clone(), kind),
        };
        if let Some(previous) = &replaced {
            warn!(
                target = %rule.target,
                previous = previous.label(),
                "Rule replaced an existing rule for the same target"
            );
        } else {
            debug!(target = %rule.target, "Rule registered");
        }
        replaced
    }

    /// Number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.object_rules.len().saturating_add(self.scene_rules.len())
    }

    /// Remove every rule.
    pub fn clear(&mut self) {
        self.object_rules.clear();
        self.scene_rules.clear();
    }

    /// Iterate over gate and rewire rules.
    pub fn object_rules(&self) -> impl Iterator<Item = (&PatchTarget, &PatchKind)> {
        self.object_rules.iter()
    }

    /// Iterate over spawn rules.
    pub fn scene_rules(&self) -> impl Iterator<Item = (&PatchTarget, &SpawnPatch)> {
        self.scene_rules.iter()
    }

    /// Run matching gate and rewire rules against a newly created FSM.
    pub fn on_object_created(&self, scene: &SceneName, object: &ObjectName, fsm: &mut Fsm) -> DispatchReport {
        let mut report = DispatchReport::default();
        for (target, kind) in &self.object_rules {
            if !target.matches(scene, object, fsm.name()) {
                continue;
            }
            let result = match kind {
                PatchKind::Gate(gate) => gate.apply(fsm),
                PatchKind::Rewire(rewire) => rewire.apply(fsm),
                PatchKind::Spawn(_) => continue,
            };
            report.record(target, kind.label(), result);
        }
        if !report.is_empty() {
            debug!(
                scene = %scene,
                object = %object,
                applied = report.applied,
                already_applied = report.already_applied,
                skipped = report.skipped,
                "Object patched"
            );
        }
        report
    }

    /// Run the spawn rules registered for `scene`.
    pub fn on_scene_loaded(&self, scene: &SceneName, host: &mut dyn SceneHost) -> DispatchReport {
        let mut report = DispatchReport::default();
        for (target, spawn) in &self.scene_rules {
            if spawn.scene != *scene {
                continue;
            }
            report.record(target, "spawn", spawn.apply(host));
        }
        report
    }
}
