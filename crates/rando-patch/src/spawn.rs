//! The spawn patch: place a new pickup where the scene has none.
//!
//! The pickup is copied from the host's cached template, renamed, positioned
//! and activated. Its FSM is edited so it drops straight down instead of
//! being flung sideways. The template FSM copy is edited before anything is
//! placed, so a template of the wrong shape places nothing.

use rando_fsm::{Action, Fsm};
use rando_types::{ObjectName, SceneName};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::PatchError;
use crate::ports::{Position, SceneHost};
use crate::rule::PatchOutcome;

/// State deciding whether the pickup is flung.
pub const FLING_DECISION_STATE: &str = "Fling?";
/// State running the fling action.
pub const FLING_STATE: &str = "Fling R";
/// Straight down, in degrees.
pub const DROP_ANGLE: f32 = 270.0;
/// Near-zero fling speed; zero speed misplaces the pickup.
pub const DROP_SPEED: f32 = 0.1;

/// Where a spawned pickup appears.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpawnAnchor {
    /// A literal coordinate.
    At(Position),
    /// The position of an existing scene object.
    AtObject(ObjectName),
}

/// Parameters of one spawned pickup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPatch {
    /// Scene to spawn in.
    pub scene: SceneName,
    /// Name of the new pickup; also the sentinel.
    pub new_name: ObjectName,
    /// Where to put it.
    pub anchor: SpawnAnchor,
}

impl SpawnPatch {
    /// Spawn the pickup unless it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::MissingExternalObject`] if the anchor object is
    /// absent, [`PatchError::MissingTemplate`] if the host has no template,
    /// or a shape error if the template FSM cannot be edited.
    pub fn apply(&self, host: &mut dyn SceneHost) -> Result<PatchOutcome, PatchError> {
        if host.object_exists(&self.scene, &self.new_name) {
            debug!(scene = %self.scene, object = %self.new_name, "Pickup already spawned");
            return Ok(PatchOutcome::AlreadyApplied);
        }

        let position = match &self.anchor {
            SpawnAnchor::At(position) => *position,
            SpawnAnchor::AtObject(object) => host.object_position(&self.scene, object).ok_or_else(|| {
                PatchError::MissingExternalObject {
                    scene: self.scene.clone(),
                    object: object.clone(),
                }
            })?,
        };

        let mut fsm = host.template_fsm().ok_or(PatchError::MissingTemplate)?;
        force_straight_drop(&mut fsm)?;
        host.place_pickup(&self.scene, &self.new_name, position, fsm);

        info!(
            scene = %self.scene,
            object = %self.new_name,
            x = position.x,
            y = position.y,
            "Pickup spawned"
        );
        Ok(PatchOutcome::Applied)
    }
}

/// Skip the fling decision and make the fling a slow vertical drop.
///
/// # Errors
///
/// Returns a shape error if `Fling?` or `Fling R` is missing, or if
/// `Fling R` has no fling action.
pub fn force_straight_drop(fsm: &mut Fsm) -> Result<(), PatchError> {
    fsm.edit(|draft| -> Result<(), PatchError> {
        let decision = draft.state_mut(FLING_DECISION_STATE)?;
        decision.clear_transitions();
        decision.add_transition("FINISHED", FLING_STATE);

        let fling = draft
            .state_mut(FLING_STATE)?
            .actions_mut()
            .iter_mut()
            .find(|action| matches!(action, Action::Fling { .. }))
            .ok_or_else(|| PatchError::MissingElement {
                state: FLING_STATE.to_owned(),
                element: "fling action",
            })?;
        if let Action::Fling {
            angle_min,
            angle_max,
            speed_min,
            speed_max,
        } = fling
        {
            *angle_min = DROP_ANGLE;
            *angle_max = DROP_ANGLE;
            *speed_min = DROP_SPEED;
            *speed_max = DROP_SPEED;
        }
        Ok(())
    })
}
