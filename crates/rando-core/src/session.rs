//! The run session.
//!
//! A [`Session`] is created once per run by [`Session::start_run`]. It owns
//! the shared catalog, the pre-placement samples, the fixed placement map,
//! the registered patch rules, the prompt poll scheduler and the tracker.
//! The host forwards runtime events to it and gets back what it must do.
//!
//! Start-up order:
//!
//! 1. Join the background catalog parse.
//! 2. Seed the RNG and run the pre-placement sampler.
//! 3. Ask the placement algorithm for the placement map.
//! 4. Register gate, spawn and rewire rules.
//! 5. Apply the new-run bonuses and grant the starting loadout.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rando_fsm::Fsm;
use rando_grant::{GrantContext, GrantError, GrantInterpreter, MemoryTracker};
use rando_patch::{
    DispatchReport, GatePatch, ObjectMatch, PatchDispatcher, PatchKind, PatchRule, PatchTarget,
    PollEvent, PollScheduler, Position, PromptContext, PromptUi, SceneHost, SpawnAnchor,
    SpawnPatch, hostile_shade_fix, void_heart_fix,
};
use rando_sampler::{PrePlacement, SamplerError, sample_all};
use rando_types::{
    Catalog, CostSpec, FsmName, GrantEffect, LocationDef, LocationId, ObjectName, ProgressStore,
    SceneName, SignalSink, TrackerEntryId,
};
use tracing::{debug, info, warn};

use crate::catalog::CatalogError;
use crate::config::RandoConfig;
use crate::loader::CatalogLoader;
use crate::placement::{PlacementAlgorithm, PlacementMap};
use crate::run_init::{apply_new_run_bonuses, grant_loadout};

/// Errors that can occur while starting or driving a run.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The catalog could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Pre-placement sampling failed.
    #[error("sampler error: {0}")]
    Sampler(#[from] SamplerError),

    /// A grant could not be applied.
    #[error("grant error: {0}")]
    Grant(#[from] GrantError),

    /// A collect trigger named a location with nothing placed at it.
    #[error("nothing placed at location: {0}")]
    UnknownLocation(LocationId),
}

/// Object and FSM hosting the charm menu.
const CHARM_MENU: (&str, &str) = ("Charms", "UI Charms");

/// Shade object prefixes and the FSM holding their friendliness check.
const SHADE_FSMS: [(&str, &str); 2] = [("Shade Sibling", "Control"), ("Hollow Shade", "Shade Control")];

/// State of one run.
#[derive(Debug)]
pub struct Session {
    catalog: Arc<Catalog>,
    config: RandoConfig,
    pre: PrePlacement,
    placements: PlacementMap,
    dispatcher: PatchDispatcher,
    scheduler: PollScheduler,
    tracker: MemoryTracker,
}

impl Session {
    /// Start a run.
    ///
    /// Sampling is seeded from `config.run.seed`, so the same seed, catalog
    /// and placement algorithm give the same run.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Catalog`] if the catalog failed to load, or
    /// [`SessionError::Sampler`] if pre-placement sampling failed. Loadout
    /// grant failures are logged and do not fail the start.
    pub async fn start_run(
        loader: CatalogLoader,
        config: RandoConfig,
        algorithm: &dyn PlacementAlgorithm,
        store: &mut dyn ProgressStore,
        signals: &mut dyn SignalSink,
    ) -> Result<Self, SessionError> {
        let catalog = loader.join().await?;

        let mut rng = StdRng::seed_from_u64(config.run.seed);
        let pre = sample_all(&catalog, &config.randomization, &mut rng)?;
        let placements = algorithm.place(&catalog, &pre);

        let mut session = Self {
            catalog,
            scheduler: PollScheduler::new(config.patcher.poll_max_ticks),
            config,
            pre,
            placements,
            dispatcher: PatchDispatcher::new(),
            tracker: MemoryTracker::new(),
        };
        session.build_rules();

        apply_new_run_bonuses(store, &session.config.quality_of_life);
        let interpreter = GrantInterpreter::new(&session.catalog, session.config.grant_options());
        let mut ctx = GrantContext {
            store,
            tracker: &mut session.tracker,
            signals,
        };
        grant_loadout(&session.catalog, &interpreter, &session.pre.loadout, &mut ctx);

        info!(
            seed = session.config.run.seed,
            start = %session.pre.start.name,
            placements = session.placements.len(),
            rules = session.dispatcher.rule_count(),
            "Run started"
        );
        Ok(session)
    }

    /// Register every rule the run needs, replacing any earlier set.
    fn build_rules(&mut self) {
        self.dispatcher.clear();
        for (location, placement) in self.placements.iter() {
            let Some(def) = self.catalog.location(location) else {
                warn!(location = %location, "Placement at unknown location, no rules built");
                continue;
            };
            if let Some(cost) = &placement.cost {
                self.dispatcher.register(PatchRule {
                    target: location_target(def),
                    kind: PatchKind::Gate(GatePatch {
                        requester: def.object.clone(),
                        item: placement.item.clone(),
                        cost: cost.clone(),
                    }),
                });
            }
            if let Some(spawn) = &def.spawn {
                let anchor = match &spawn.at_object {
                    Some(object) => SpawnAnchor::AtObject(object.clone()),
                    None => SpawnAnchor::At(Position::new(spawn.x, spawn.y)),
                };
                self.dispatcher.register(PatchRule {
                    target: location_target(def),
                    kind: PatchKind::Spawn(SpawnPatch {
                        scene: def.scene.clone(),
                        new_name: def.object.clone(),
                        anchor,
                    }),
                });
            }
        }

        if self.config.patcher.void_heart_fix {
            let (object, fsm) = CHARM_MENU;
            self.dispatcher.register(PatchRule {
                target: PatchTarget {
                    scene: None,
                    object: ObjectMatch::Exact(ObjectName::from(object)),
                    fsm: FsmName::from(fsm),
                },
                kind: PatchKind::Rewire(void_heart_fix()),
            });
        }
        if self.config.patcher.hostile_shades {
            for (prefix, fsm) in SHADE_FSMS {
                self.dispatcher.register(PatchRule {
                    target: PatchTarget::prefix_anywhere(prefix, FsmName::from(fsm)),
                    kind: PatchKind::Rewire(hostile_shade_fix()),
                });
            }
        }
        debug!(rules = self.dispatcher.rule_count(), "Patch rules registered");
    }

    // ------------------------------------------------------------------
    // Runtime events
    // ------------------------------------------------------------------

    /// A scene object carrying `fsm` was created.
    pub fn on_object_created(&self, scene: &SceneName, object: &ObjectName, fsm: &mut Fsm) -> DispatchReport {
        self.dispatcher.on_object_created(scene, object, fsm)
    }

    /// A scene finished loading.
    pub fn on_scene_loaded(&self, scene: &SceneName, host: &mut dyn SceneHost) -> DispatchReport {
        self.dispatcher.on_scene_loaded(scene, host)
    }

    /// Run a gate's `OpenPrompt` action. Returns whether `cost` is
    /// affordable; when it is not, the insufficient-cost check is scheduled.
    pub fn open_prompt(
        &mut self,
        scene: &SceneName,
        requester: &ObjectName,
        cost: &CostSpec,
        store: &dyn ProgressStore,
        host: &dyn SceneHost,
        ui: &mut dyn PromptUi,
    ) -> bool {
        let mut ctx = PromptContext {
            scene,
            store,
            host,
            ui,
            scheduler: &mut self.scheduler,
        };
        rando_patch::open_prompt(requester, cost, &mut ctx)
    }

    /// Run a gate's `ClosePrompt` action: drop any pending check for
    /// `requester` in `scene` and close the dialogue.
    pub fn close_prompt(&mut self, scene: &SceneName, requester: &ObjectName, ui: &mut dyn PromptUi) {
        if self.scheduler.cancel(scene, requester) {
            debug!(scene = %scene, requester = %requester, "Pending prompt check cancelled");
        }
        ui.close();
    }

    /// Whether `cost` can be paid right now.
    #[allow(clippy::unused_self)]
    pub fn is_affordable(
        &self,
        cost: &CostSpec,
        store: &dyn ProgressStore,
        host: &dyn SceneHost,
        scene: &SceneName,
    ) -> bool {
        rando_patch::is_affordable(cost, store, host, scene)
    }

    /// Advance the prompt checks by one tick.
    ///
    /// The host must deliver `NOT ENOUGH` to the requester of every
    /// [`PollEvent::NotEnough`] returned.
    pub fn tick(&mut self, ui: &mut dyn PromptUi) -> Vec<PollEvent> {
        let events = self.scheduler.tick(ui);
        if !events.is_empty() {
            debug!(events = events.len(), pending = self.scheduler.len(), "Prompt checks advanced");
        }
        events
    }

    /// The player collected the pickup at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownLocation`] if nothing is placed there,
    /// or [`SessionError::Grant`] if the grant fails.
    pub fn collect(
        &mut self,
        location: &LocationId,
        store: &mut dyn ProgressStore,
        signals: &mut dyn SignalSink,
    ) -> Result<TrackerEntryId, SessionError> {
        let placement = self
            .placements
            .get(location)
            .ok_or_else(|| SessionError::UnknownLocation(location.clone()))?;
        let effect = GrantEffect::new(placement.kind, placement.item.clone(), location.clone());
        self.interpret_grant(&effect, store, signals)
    }

    /// Apply one grant effect.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Grant`] if the effect needs catalog data
    /// that is missing.
    pub fn interpret_grant(
        &mut self,
        effect: &GrantEffect,
        store: &mut dyn ProgressStore,
        signals: &mut dyn SignalSink,
    ) -> Result<TrackerEntryId, SessionError> {
        let interpreter = GrantInterpreter::new(&self.catalog, self.config.grant_options());
        let mut ctx = GrantContext {
            store,
            tracker: &mut self.tracker,
            signals,
        };
        Ok(interpreter.apply(effect, &mut ctx)?)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The location whose pickup is `object` in `scene`.
    pub fn location_at(&self, scene: &SceneName, object: &ObjectName) -> Option<&LocationId> {
        self.catalog
            .locations()
            .find(|l| &l.scene == scene && &l.object == object)
            .map(|l| &l.name)
    }

    /// The shared catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The configuration the run was started with.
    pub const fn config(&self) -> &RandoConfig {
        &self.config
    }

    /// The pre-placement samples.
    pub const fn pre_placement(&self) -> &PrePlacement {
        &self.pre
    }

    /// The placement map.
    pub const fn placements(&self) -> &PlacementMap {
        &self.placements
    }

    /// The registered rules.
    pub const fn dispatcher(&self) -> &PatchDispatcher {
        &self.dispatcher
    }

    /// The prompt poll scheduler.
    pub const fn scheduler(&self) -> &PollScheduler {
        &self.scheduler
    }

    /// Every collection recorded this run.
    pub const fn tracker(&self) -> &MemoryTracker {
        &self.tracker
    }
}

fn location_target(def: &LocationDef) -> PatchTarget {
    PatchTarget::exact(def.scene.clone(), def.object.clone(), def.fsm.clone())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rando_types::{CostKind, ItemId, MemoryStore, Signal, keys};

    use super::*;
    use crate::placement::VanillaPlacement;

    async fn vanilla_run(config: RandoConfig) -> (Session, MemoryStore) {
        let mut store = MemoryStore::new_game();
        let mut signals: Vec<Signal> = Vec::new();
        let session = Session::start_run(
            CatalogLoader::spawn_default(),
            config,
            &VanillaPlacement,
            &mut store,
            &mut signals,
        )
        .await
        .unwrap();
        (session, store)
    }

    #[tokio::test]
    async fn start_run_registers_gates_spawns_and_fixes() {
        let (session, store) = vanilla_run(RandoConfig::default()).await;

        let gated = session.placements().iter().filter(|(_, p)| p.cost.is_some()).count();
        let spawns = session.dispatcher().scene_rules().count();
        assert!(gated > 0);
        assert_eq!(spawns, 2);
        // gates, the charm menu fix and two shade fixes
        assert_eq!(
            session.dispatcher().object_rules().count(),
            gated.saturating_add(3)
        );
        assert!(store.get_bool(keys::HAS_CHARM));
        assert_eq!(
            session.tracker().len(),
            session.pre_placement().loadout.items.len()
        );
    }

    #[tokio::test]
    async fn fixes_follow_config() {
        let mut config = RandoConfig::default();
        config.patcher.void_heart_fix = false;
        config.patcher.hostile_shades = false;
        let (session, _) = vanilla_run(config).await;
        assert!(
            session
                .dispatcher()
                .object_rules()
                .all(|(_, kind)| matches!(kind, PatchKind::Gate(_)))
        );
    }

    #[tokio::test]
    async fn collect_unknown_location_fails() {
        let (mut session, mut store) = vanilla_run(RandoConfig::default()).await;
        let mut signals: Vec<Signal> = Vec::new();
        let result = session.collect(&LocationId::from("Nowhere"), &mut store, &mut signals);
        assert!(matches!(result, Err(SessionError::UnknownLocation(_))));
    }

    #[tokio::test]
    async fn collect_grants_placed_item() {
        let (mut session, mut store) = vanilla_run(RandoConfig::default()).await;
        let mut signals: Vec<Signal> = Vec::new();
        let before = session.tracker().len();
        session
            .collect(&LocationId::from("Crystal_Heart"), &mut store, &mut signals)
            .unwrap();
        assert!(store.get_bool("hasSuperDash"));
        assert!(store.is_obtained(&ItemId::from("Crystal_Heart")));
        assert_eq!(session.tracker().len(), before.saturating_add(1));
    }

    #[tokio::test]
    async fn location_lookup_by_object() {
        let (session, _) = vanilla_run(RandoConfig::default()).await;
        let found = session.location_at(&SceneName::from("RestingGrounds_07"), &ObjectName::from("Shiny_12"));
        assert_eq!(found, Some(&LocationId::from("Dream_Gate")));
        let gate = session.placements().get(&LocationId::from("Dream_Gate")).unwrap();
        assert_eq!(gate.cost.as_ref().map(|c| c.kind), Some(CostKind::Essence));
    }

    #[tokio::test]
    async fn same_seed_same_run() {
        let (a, _) = vanilla_run(RandoConfig::default()).await;
        let (b, _) = vanilla_run(RandoConfig::default()).await;
        assert_eq!(a.pre_placement(), b.pre_placement());
        assert_eq!(a.placements(), b.placements());
    }
}
