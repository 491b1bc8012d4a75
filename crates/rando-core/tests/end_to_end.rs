//! End-to-end run tests.
//!
//! A run is started from a small catalog with one essence-gated pickup. The
//! pickup FSM is driven through its events the way the runtime would,
//! with in-memory stand-ins for the scene and the prompt dialogue.

#![allow(clippy::unwrap_used)]

use rando_core::{CatalogLoader, RandoConfig, Session, VanillaPlacement};
use rando_fsm::{Action, Fsm, State};
use rando_patch::{PollEvent, Position, PromptUi, SceneHost};
use rando_types::{
    CostSpec, FsmName, ItemId, LocationId, MemoryStore, ObjectName, ProgressStore, SceneName,
    Signal, keys,
};

const CATALOG: &str = r#"
items:
  - { name: X, pool: relic, kind: set_flag, label: Relic X, bool_name: hasX, cost_kind: essence, cost: 7 }
locations:
  - { name: X_Location, scene: RestingGrounds_07, object: Shiny_12, fsm: Shiny Control, vanilla_item: X }
starts:
  - { name: "King's Pass", waypoint: "King's_Pass", item_safe: true, area_safe: true, room_safe: true }
"#;

#[derive(Default)]
struct EmptyScene;

impl SceneHost for EmptyScene {
    fn object_exists(&self, _scene: &SceneName, _object: &ObjectName) -> bool {
        false
    }

    fn object_position(&self, _scene: &SceneName, _object: &ObjectName) -> Option<Position> {
        None
    }

    fn child_active(&self, _scene: &SceneName, _object: &ObjectName, _child: &str) -> Option<bool> {
        None
    }

    fn template_fsm(&self) -> Option<Fsm> {
        None
    }

    fn place_pickup(&mut self, _scene: &SceneName, _name: &ObjectName, _at: Position, _fsm: Fsm) {}
}

#[derive(Default)]
struct Dialogue {
    shown: Vec<(String, u32)>,
    insufficient: bool,
    open: bool,
}

impl PromptUi for Dialogue {
    fn show(&mut self, text: &str, toll: u32) {
        self.shown.push((text.to_owned(), toll));
        self.insufficient = false;
        self.open = true;
    }

    fn is_ready_for_input(&self) -> bool {
        self.open
    }

    fn mark_insufficient(&mut self) {
        self.insufficient = true;
    }

    fn close(&mut self) {
        self.open = false;
    }
}

fn shiny_fsm() -> Fsm {
    let mut fsm = Fsm::new(FsmName::from("Shiny Control"))
        .with_state(State::new("Idle").with_transition("INSPECT", "Charm?"))
        .unwrap()
        .with_state(State::new("Charm?").with_transition("YES", "Trink Flash"))
        .unwrap()
        .with_state(State::new("Trink Flash").with_transition("FINISHED", "Idle"))
        .unwrap();
    fsm.set_active("Idle").unwrap();
    fsm
}

/// Fire `event` and return the prompt the entered state opens, if any.
fn fire_for_prompt(fsm: &mut Fsm, event: &str) -> Option<(ObjectName, CostSpec)> {
    let state = fsm.fire(event).unwrap()?;
    state.actions().iter().find_map(|action| match action {
        Action::OpenPrompt { requester, cost, .. } => Some((requester.clone(), cost.clone())),
        _ => None,
    })
}

fn entered_closes_prompt(fsm: &mut Fsm, event: &str) -> bool {
    fsm.fire(event)
        .unwrap()
        .is_some_and(|state| state.actions().first() == Some(&Action::ClosePrompt))
}

async fn start() -> (Session, MemoryStore) {
    let mut store = MemoryStore::new_game();
    let mut signals: Vec<Signal> = Vec::new();
    let session = Session::start_run(
        CatalogLoader::spawn(String::from(CATALOG)),
        RandoConfig::default(),
        &VanillaPlacement,
        &mut store,
        &mut signals,
    )
    .await
    .unwrap();
    (session, store)
}

#[tokio::test]
async fn essence_gate_rejects_then_accepts() {
    let (mut session, mut store) = start().await;
    let scene = SceneName::from("RestingGrounds_07");
    let object = ObjectName::from("Shiny_12");
    let item = ItemId::from("X");
    let host = EmptyScene;
    let mut ui = Dialogue::default();
    let mut signals: Vec<Signal> = Vec::new();

    let mut fsm = shiny_fsm();
    let report = session.on_object_created(&scene, &object, &mut fsm);
    assert_eq!(report.applied, 1);

    // Not enough essence: the prompt is marked insufficient and rejects.
    store.set_int(keys::DREAM_ORBS, 3);
    let (requester, cost) = fire_for_prompt(&mut fsm, "INSPECT").unwrap();
    assert_eq!(requester, object);
    assert_eq!(cost.amount, 7);
    assert!(!session.open_prompt(&scene, &requester, &cost, &store, &host, &mut ui));
    assert_eq!(ui.shown.last().map(|(_, toll)| *toll), Some(0));

    let events = session.tick(&mut ui);
    assert_eq!(
        events,
        vec![PollEvent::NotEnough {
            scene: scene.clone(),
            requester: requester.clone()
        }]
    );
    assert!(ui.insufficient);
    assert!(entered_closes_prompt(&mut fsm, "NOT ENOUGH"));
    session.close_prompt(&scene, &requester, &mut ui);
    assert_eq!(fsm.fire("FINISHED").unwrap().map(State::name), Some("Give Control"));
    assert_eq!(fsm.fire("FINISHED").unwrap().map(State::name), Some("Idle"));

    assert!(!store.is_obtained(&item));
    assert!(!store.get_bool("hasX"));
    assert!(session.tracker().is_empty());

    // Enough essence: the prompt accepts and the pickup is collected.
    store.set_int(keys::DREAM_ORBS, 7);
    let (requester, cost) = fire_for_prompt(&mut fsm, "INSPECT").unwrap();
    assert!(session.open_prompt(&scene, &requester, &cost, &store, &host, &mut ui));
    assert!(!session.scheduler().is_pending(&scene, &requester));
    assert!(entered_closes_prompt(&mut fsm, "YES"));
    session.close_prompt(&scene, &requester, &mut ui);
    assert!(!ui.open);

    let location = session.location_at(&scene, &requester).cloned().unwrap();
    assert_eq!(location, LocationId::from("X_Location"));
    session.collect(&location, &mut store, &mut signals).unwrap();

    assert!(store.is_obtained(&item));
    assert!(store.get_bool("hasX"));
    assert_eq!(session.tracker().len(), 1);
    assert_eq!(session.tracker().count_for(&item), 1);
}

#[tokio::test]
async fn gate_is_inserted_once_per_object() {
    let (session, _) = start().await;
    let scene = SceneName::from("RestingGrounds_07");
    let object = ObjectName::from("Shiny_12");

    let mut fsm = shiny_fsm();
    assert_eq!(session.on_object_created(&scene, &object, &mut fsm).applied, 1);
    let patched = fsm.clone();
    let again = session.on_object_created(&scene, &object, &mut fsm);
    assert_eq!(again.applied, 0);
    assert_eq!(again.already_applied, 1);
    assert_eq!(fsm, patched);

    let elsewhere = session.on_object_created(&SceneName::from("Town"), &object, &mut shiny_fsm());
    assert!(elsewhere.is_empty());
}

#[tokio::test]
async fn closing_the_prompt_cancels_the_pending_check() {
    let (mut session, store) = start().await;
    let scene = SceneName::from("RestingGrounds_07");
    let requester = ObjectName::from("Shiny_12");
    let cost = CostSpec::new(rando_types::CostKind::Essence, 7, "Relic X");
    let mut ui = Dialogue::default();

    assert!(!session.open_prompt(&scene, &requester, &cost, &store, &EmptyScene, &mut ui));
    assert!(session.scheduler().is_pending(&scene, &requester));
    session.close_prompt(&scene, &requester, &mut ui);
    assert!(!session.scheduler().is_pending(&scene, &requester));
    assert!(session.tick(&mut ui).is_empty());
}
