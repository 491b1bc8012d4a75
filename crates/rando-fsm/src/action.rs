//! Actions executed when a state is entered.
//!
//! The patcher only needs to recognise a handful of actions it inserts or
//! tweaks. Everything else the runtime put in a state is carried through as
//! [`Action::Opaque`] so edits never lose it.

use rando_types::{CostSpec, ItemId, ObjectName, Signal};
use serde::{Deserialize, Serialize};

/// One entry of a state's ordered action list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Show the yes/no confirmation prompt for a gated pickup.
    OpenPrompt {
        /// Object owning the FSM; receives `NOT ENOUGH` when unaffordable.
        requester: ObjectName,
        /// Item offered by the pickup.
        item: ItemId,
        /// Cost shown in and checked by the prompt.
        cost: CostSpec,
    },
    /// Hide the confirmation prompt.
    ClosePrompt,
    /// Broadcast a global event.
    Broadcast(Signal),
    /// Play a hero animation clip, firing `on_complete` when it ends.
    PlayAnimation {
        /// Clip name.
        clip: String,
        /// Event sent to this FSM when the clip finishes.
        on_complete: String,
    },
    /// Throw the owning object out of its container.
    Fling {
        /// Lower angle bound in degrees.
        angle_min: f32,
        /// Upper angle bound in degrees.
        angle_max: f32,
        /// Lower speed bound.
        speed_min: f32,
        /// Upper speed bound.
        speed_max: f32,
    },
    /// A runtime-native action the patcher does not interpret.
    Opaque(String),
}

impl Action {
    /// Short label used in logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::OpenPrompt { .. } => "open_prompt",
            Self::ClosePrompt => "close_prompt",
            Self::Broadcast(_) => "broadcast",
            Self::PlayAnimation { .. } => "play_animation",
            Self::Fling { .. } => "fling",
            Self::Opaque(_) => "opaque",
        }
    }
}
