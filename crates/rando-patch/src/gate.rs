//! The conditional gate patch.
//!
//! Turns a pickup's plain "take it?" decision into a cost-gated yes/no
//! prompt. Relative to the pickup FSM:
//!
//! ```text
//! Idle --INSPECT--> Charm? --YES--------> <accept>
//!                     |--NO / HERO DAMAGED / NOT ENOUGH--> YN No --FINISHED--> Give Control --FINISHED--> Idle
//! ```
//!
//! `YN No` is the sentinel: an FSM that already has it is left untouched.

use rando_fsm::{Action, Fsm};
use rando_types::{CostKind, CostSpec, ItemId, ObjectName, ProgressStore, SceneName, Signal};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::afford::is_affordable;
use crate::error::PatchError;
use crate::poll::PollScheduler;
use crate::ports::{PromptUi, SceneHost};
use crate::rule::PatchOutcome;

/// Decision state offering the pickup.
pub const DECISION_STATE: &str = "Charm?";
/// Idle state the pickup waits in.
pub const IDLE_STATE: &str = "Idle";
/// Reject state added by the patch.
pub const REJECT_STATE: &str = "YN No";
/// Cleanup state added by the patch.
pub const CLEANUP_STATE: &str = "Give Control";
/// Hero animation played when the offer is declined.
pub const DECLINE_CLIP: &str = "Collect Normal 3";

/// Parameters of one gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatePatch {
    /// Pickup object owning the FSM.
    pub requester: ObjectName,
    /// Item behind the gate.
    pub item: ItemId,
    /// What the player must have.
    pub cost: CostSpec,
}

impl GatePatch {
    /// Insert the gate sub-graph into `fsm`.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError`] if the FSM lacks `Charm?`, `Idle` or a first
    /// transition out of `Charm?`. The FSM is unchanged in that case.
    pub fn apply(&self, fsm: &mut Fsm) -> Result<PatchOutcome, PatchError> {
        if fsm.has_state(REJECT_STATE) {
            debug!(requester = %self.requester, "Gate already present");
            return Ok(PatchOutcome::AlreadyApplied);
        }

        fsm.edit(|draft| -> Result<(), PatchError> {
            let accept = draft
                .state(DECISION_STATE)?
                .first_target()
                .map(str::to_owned)
                .ok_or_else(|| PatchError::MissingElement {
                    state: DECISION_STATE.to_owned(),
                    element: "transition",
                })?;

            draft.clone_state(IDLE_STATE, REJECT_STATE)?;
            let reject = draft.state_mut(REJECT_STATE)?;
            reject.clear_transitions();
            reject.clear_actions();
            reject.add_transition("FINISHED", CLEANUP_STATE);
            reject.append_action(Action::ClosePrompt);
            reject.append_action(Action::PlayAnimation {
                clip: DECLINE_CLIP.to_owned(),
                on_complete: String::from("FINISHED"),
            });

            draft.clone_state(IDLE_STATE, CLEANUP_STATE)?;
            let cleanup = draft.state_mut(CLEANUP_STATE)?;
            cleanup.clear_transitions();
            cleanup.clear_actions();
            cleanup.add_transition("FINISHED", IDLE_STATE);
            cleanup.append_action(Action::Broadcast(Signal::EndInspect));

            let decision = draft.state_mut(DECISION_STATE)?;
            decision.clear_transitions();
            decision.add_transition("HERO DAMAGED", REJECT_STATE);
            decision.add_transition("NO", REJECT_STATE);
            decision.add_transition("NOT ENOUGH", REJECT_STATE);
            decision.add_transition("YES", accept.as_str());
            decision.insert_action_first(Action::OpenPrompt {
                requester: self.requester.clone(),
                item: self.item.clone(),
                cost: self.cost.clone(),
            });

            draft.state_mut(&accept)?.insert_action_first(Action::ClosePrompt);
            Ok(())
        })?;

        info!(
            requester = %self.requester,
            item = %self.item,
            cost_kind = %self.cost.kind,
            amount = self.cost.amount,
            "Gate inserted"
        );
        Ok(PatchOutcome::Applied)
    }
}

/// Handles the prompt needs when it opens.
pub struct PromptContext<'a> {
    /// Scene the requester lives in.
    pub scene: &'a SceneName,
    /// Persistent progress data, read only.
    pub store: &'a dyn ProgressStore,
    /// Scene queries for world-flag gates.
    pub host: &'a dyn SceneHost,
    /// The dialogue box.
    pub ui: &'a mut dyn PromptUi,
    /// Scheduler for the insufficient-cost check.
    pub scheduler: &'a mut PollScheduler,
}

/// Run the `OpenPrompt` action: show the prompt and, when the cost cannot be
/// paid, schedule the check that marks it insufficient.
///
/// Returns whether the cost is affordable.
pub fn open_prompt(requester: &ObjectName, cost: &CostSpec, ctx: &mut PromptContext<'_>) -> bool {
    let text = cost.prompt_text(&prompt_label(cost));
    let toll = if cost.kind == CostKind::Currency {
        cost.amount
    } else {
        0
    };
    ctx.ui.show(&text, toll);

    let affordable = is_affordable(cost, ctx.store, ctx.host, ctx.scene);
    if !affordable {
        ctx.scheduler.schedule(ctx.scene, requester);
    }
    debug!(scene = %ctx.scene, requester = %requester, text = %text, toll, affordable, "Prompt opened");
    affordable
}

/// Label for the prompt. Dream-locked dream nails read as "Dream Gate".
fn prompt_label(cost: &CostSpec) -> String {
    let dream_locked = matches!(
        cost.kind,
        CostKind::Essence | CostKind::DreamNailFlag | CostKind::WorldFlag
    );
    if dream_locked && cost.display_text == "Dream Nail" {
        String::from("Dream Gate")
    } else {
        cost.display_text.clone()
    }
}
