//! In-memory host used to drive a run without the game.
//!
//! [`HeadlessScene`] stands in for the loaded scenes and the cached pickup
//! template, [`HeadlessPrompt`] for the yes/no dialogue. [`run_script`]
//! walks every placed location once: load spawn scenes, create each
//! pickup, inspect it, answer its prompt and collect it when allowed.

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

use rando_core::Session;
use rando_fsm::{Action, Fsm, State};
use rando_patch::gate::{DECISION_STATE, IDLE_STATE};
use rando_patch::spawn::{FLING_DECISION_STATE, FLING_STATE};
use rando_patch::{PollEvent, Position, PromptUi, SceneHost};
use rando_types::{CostSpec, FsmName, LocationId, ObjectName, ProgressStore, SceneName, SignalSink};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::EngineError;

/// Ticks the script waits for a prompt check before giving up on it.
const MAX_SCRIPT_TICKS: u32 = 1_000;

/// The accept branch of the template pickup.
const ACCEPT_STATE: &str = "Trink Flash";

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// A pickup placed by a spawn patch.
#[derive(Debug, Clone)]
pub struct PlacedPickup {
    /// Scene it was placed in.
    pub scene: SceneName,
    /// Its object name.
    pub name: ObjectName,
    /// Where it appeared.
    pub at: Position,
    /// Its FSM after the spawn edits.
    pub fsm: Fsm,
}

/// Scene objects, their dream-dialogue children and the pickup template.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    objects: BTreeMap<(SceneName, ObjectName), Position>,
    children: BTreeMap<(SceneName, ObjectName, String), bool>,
    template: Option<Fsm>,
    placed: Vec<PlacedPickup>,
}

impl HeadlessScene {
    /// A scene with the objects the default catalog anchors to.
    pub fn with_default_objects() -> Result<Self, EngineError> {
        let mut scene = Self {
            template: Some(pickup_template()?),
            ..Self::default()
        };
        scene.add_object("Crossroads_38", "Grub King", Position::new(42.0, 12.5));
        scene.add_object("Fungus1_13", "Dream Plant", Position::new(88.5, 31.0));
        scene.set_child("Fungus1_13", "Dream Plant", "Dream Dialogue", true);
        Ok(scene)
    }

    /// Put an object in a scene.
    pub fn add_object(&mut self, scene: &str, object: &str, at: Position) {
        self.objects
            .insert((SceneName::from(scene), ObjectName::from(object)), at);
    }

    /// Set whether a named child of an object is active.
    pub fn set_child(&mut self, scene: &str, object: &str, child: &str, active: bool) {
        self.children.insert(
            (SceneName::from(scene), ObjectName::from(object), child.to_owned()),
            active,
        );
    }

    /// Pickups placed so far.
    pub fn placed(&self) -> &[PlacedPickup] {
        &self.placed
    }

    /// The FSM of the pickup `object`: the spawned one if it was placed,
    /// otherwise a fresh template copy.
    fn pickup_fsm(&self, scene: &SceneName, object: &ObjectName) -> Option<Fsm> {
        self.placed
            .iter()
            .find(|p| &p.scene == scene && &p.name == object)
            .map(|p| p.fsm.clone())
            .or_else(|| self.template.clone())
    }
}

impl SceneHost for HeadlessScene {
    fn object_exists(&self, scene: &SceneName, object: &ObjectName) -> bool {
        self.objects.contains_key(&(scene.clone(), object.clone()))
            || self.placed.iter().any(|p| &p.scene == scene && &p.name == object)
    }

    fn object_position(&self, scene: &SceneName, object: &ObjectName) -> Option<Position> {
        self.objects.get(&(scene.clone(), object.clone())).copied()
    }

    fn child_active(&self, scene: &SceneName, object: &ObjectName, child: &str) -> Option<bool> {
        self.children
            .get(&(scene.clone(), object.clone(), child.to_owned()))
            .copied()
    }

    fn template_fsm(&self) -> Option<Fsm> {
        self.template.clone()
    }

    fn place_pickup(&mut self, scene: &SceneName, name: &ObjectName, at: Position, fsm: Fsm) {
        self.placed.push(PlacedPickup {
            scene: scene.clone(),
            name: name.clone(),
            at,
            fsm,
        });
    }
}

/// The shape of a stock pickup FSM.
fn pickup_template() -> Result<Fsm, EngineError> {
    let fsm = Fsm::new(FsmName::from("Shiny Control"))
        .with_state(
            State::new(FLING_DECISION_STATE)
                .with_transition("FLING L", "Fling L")
                .with_transition("FLING R", FLING_STATE),
        )?
        .with_state(State::new("Fling L").with_transition("FINISHED", IDLE_STATE))?
        .with_state(
            State::new(FLING_STATE)
                .with_transition("FINISHED", IDLE_STATE)
                .with_action(Action::Fling {
                    angle_min: 40.0,
                    angle_max: 80.0,
                    speed_min: 15.0,
                    speed_max: 25.0,
                }),
        )?
        .with_state(State::new(IDLE_STATE).with_transition("INSPECT", DECISION_STATE))?
        .with_state(
            State::new(DECISION_STATE)
                .with_transition("YES", ACCEPT_STATE)
                .with_action(Action::Opaque(String::from("Box Up"))),
        )?
        .with_state(State::new(ACCEPT_STATE).with_transition("FINISHED", IDLE_STATE))?;
    Ok(fsm)
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// Dialogue that becomes ready for input a few checks after it opens.
#[derive(Debug, Default)]
pub struct HeadlessPrompt {
    ready_after: u32,
    checks: Cell<u32>,
    open: bool,
    insufficient: bool,
    shown: u32,
}

impl HeadlessPrompt {
    /// Create a dialogue that is ready after `ready_after` checks.
    pub const fn new(ready_after: u32) -> Self {
        Self {
            ready_after,
            checks: Cell::new(0),
            open: false,
            insufficient: false,
            shown: 0,
        }
    }

    /// Number of times the dialogue was opened.
    pub const fn shown(&self) -> u32 {
        self.shown
    }

    /// Whether the last prompt was marked insufficient.
    pub const fn is_insufficient(&self) -> bool {
        self.insufficient
    }
}

impl PromptUi for HeadlessPrompt {
    fn show(&mut self, text: &str, toll: u32) {
        self.checks.set(0);
        self.open = true;
        self.insufficient = false;
        self.shown = self.shown.saturating_add(1);
        debug!(text, toll, "Prompt shown");
    }

    fn is_ready_for_input(&self) -> bool {
        if !self.open {
            return false;
        }
        let seen = self.checks.get().saturating_add(1);
        self.checks.set(seen);
        seen > self.ready_after
    }

    fn mark_insufficient(&mut self) {
        self.insufficient = true;
    }

    fn close(&mut self) {
        self.open = false;
    }
}

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// What happened during a scripted run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScriptReport {
    /// Pickups placed by spawn patches.
    pub spawned: u32,
    /// Pickups that received a gate.
    pub gated: u32,
    /// Pickups collected.
    pub collected: u32,
    /// Gates that rejected for an unaffordable cost.
    pub rejected: u32,
    /// Prompt checks that never saw the dialogue become ready.
    pub expired: u32,
    /// Locations the script could not drive.
    pub skipped: u32,
}

/// Everything the script drives.
pub struct ScriptHost<'a> {
    /// The loaded scenes.
    pub scene: &'a mut HeadlessScene,
    /// The dialogue.
    pub ui: &'a mut HeadlessPrompt,
    /// Persistent progress data.
    pub store: &'a mut dyn ProgressStore,
    /// Broadcast signal sink.
    pub signals: &'a mut dyn SignalSink,
}

/// Visit every placed location once.
///
/// # Errors
///
/// Returns [`EngineError::Fsm`] if an event cannot be delivered to a pickup
/// FSM, or [`EngineError::Session`] if a collect fails.
pub fn run_script(session: &mut Session, host: &mut ScriptHost<'_>) -> Result<ScriptReport, EngineError> {
    let mut report = ScriptReport::default();

    let spawn_scenes: BTreeSet<SceneName> = session
        .dispatcher()
        .scene_rules()
        .map(|(_, spawn)| spawn.scene.clone())
        .collect();
    for scene in &spawn_scenes {
        let dispatched = session.on_scene_loaded(scene, host.scene);
        report.spawned = report.spawned.saturating_add(dispatched.applied);
    }

    let locations: Vec<LocationId> = session.placements().iter().map(|(l, _)| l.clone()).collect();
    for location in &locations {
        let Some(def) = session.catalog().location(location).cloned() else {
            report.skipped = report.skipped.saturating_add(1);
            continue;
        };
        let Some(mut fsm) = host.scene.pickup_fsm(&def.scene, &def.object) else {
            warn!(location = %location, "No pickup FSM available");
            report.skipped = report.skipped.saturating_add(1);
            continue;
        };

        session.on_object_created(&def.scene, &def.object, &mut fsm);
        fsm.set_active(IDLE_STATE)?;

        let prompt = fire(&mut fsm, "INSPECT")?;
        let accepted = match prompt {
            Some((requester, cost)) => {
                report.gated = report.gated.saturating_add(1);
                answer_prompt(session, host, &def.scene, &mut fsm, &requester, &cost, &mut report)?
            }
            None => {
                fire(&mut fsm, "YES")?;
                true
            }
        };

        if accepted {
            session.collect(location, host.store, host.signals)?;
            report.collected = report.collected.saturating_add(1);
        }
    }

    info!(
        spawned = report.spawned,
        gated = report.gated,
        collected = report.collected,
        rejected = report.rejected,
        expired = report.expired,
        skipped = report.skipped,
        "Script finished"
    );
    Ok(report)
}

/// Open the prompt and follow it to accept or reject. Returns whether the
/// pickup was accepted.
fn answer_prompt(
    session: &mut Session,
    host: &mut ScriptHost<'_>,
    scene: &SceneName,
    fsm: &mut Fsm,
    requester: &ObjectName,
    cost: &CostSpec,
    report: &mut ScriptReport,
) -> Result<bool, EngineError> {
    if session.open_prompt(scene, requester, cost, host.store, host.scene, host.ui) {
        fire(fsm, "YES")?;
        session.close_prompt(scene, requester, host.ui);
        return Ok(true);
    }

    for _ in 0..MAX_SCRIPT_TICKS {
        for event in session.tick(host.ui) {
            match event {
                PollEvent::NotEnough { scene: at, requester: target } if &at == scene && &target == requester => {
                    fire(fsm, "NOT ENOUGH")?;
                    session.close_prompt(scene, requester, host.ui);
                    fire(fsm, "FINISHED")?;
                    fire(fsm, "FINISHED")?;
                    report.rejected = report.rejected.saturating_add(1);
                    return Ok(false);
                }
                PollEvent::Expired { scene: at, requester: target } if &at == scene && &target == requester => {
                    report.expired = report.expired.saturating_add(1);
                    session.close_prompt(scene, requester, host.ui);
                    return Ok(false);
                }
                _ => {}
            }
        }
    }

    warn!(scene = %scene, requester = %requester, "Prompt check still pending, closing");
    session.close_prompt(scene, requester, host.ui);
    report.expired = report.expired.saturating_add(1);
    Ok(false)
}

/// Fire `event` and return the prompt the entered state opens, if any.
fn fire(fsm: &mut Fsm, event: &str) -> Result<Option<(ObjectName, CostSpec)>, EngineError> {
    let Some(state) = fsm.fire(event)? else {
        debug!(event, "Event ignored");
        return Ok(None);
    };
    Ok(state.actions().iter().find_map(|action| match action {
        Action::OpenPrompt { requester, cost, .. } => Some((requester.clone(), cost.clone())),
        _ => None,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rando_core::{CatalogLoader, RandoConfig, VanillaPlacement};
    use rando_types::{ItemId, MemoryStore, Signal, keys};

    use super::*;

    async fn session(store: &mut MemoryStore) -> Session {
        let mut signals: Vec<Signal> = Vec::new();
        Session::start_run(
            CatalogLoader::spawn_default(),
            RandoConfig::default(),
            &VanillaPlacement,
            store,
            &mut signals,
        )
        .await
        .unwrap()
    }

    #[test]
    fn prompt_becomes_ready_after_delay() {
        let mut ui = HeadlessPrompt::new(2);
        assert!(!ui.is_ready_for_input());
        ui.show("Pay?", 0);
        assert!(!ui.is_ready_for_input());
        assert!(!ui.is_ready_for_input());
        assert!(ui.is_ready_for_input());
        assert_eq!(ui.shown(), 1);
        ui.mark_insufficient();
        assert!(ui.is_insufficient());
    }

    #[tokio::test]
    async fn scripted_vanilla_run() {
        let mut store = MemoryStore::new_game();
        let mut session = session(&mut store).await;
        let mut scene = HeadlessScene::with_default_objects().unwrap();
        let mut ui = HeadlessPrompt::new(3);
        let mut signals: Vec<Signal> = Vec::new();
        let mut host = ScriptHost {
            scene: &mut scene,
            ui: &mut ui,
            store: &mut store,
            signals: &mut signals,
        };

        let report = run_script(&mut session, &mut host).unwrap();

        assert_eq!(report.spawned, 2);
        assert_eq!(report.skipped, 0);
        assert!(report.rejected > 0);
        assert_eq!(report.expired, 0);
        assert_eq!(
            report.collected.saturating_add(report.rejected),
            u32::try_from(session.placements().len()).unwrap()
        );
        assert_eq!(scene.placed().len(), 2);
        // the dream gate is visited before any root pays out essence
        assert!(!store.is_obtained(&ItemId::from("Dream_Gate")));
        assert!(store.is_obtained(&ItemId::from("Mantis_Claw")));
        assert!(store.is_obtained(&ItemId::from("Hallownest_Seal-Greenpath")));
        assert_eq!(store.get_int(keys::DREAM_ORBS), 29);
    }
}
