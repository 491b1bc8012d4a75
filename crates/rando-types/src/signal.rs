//! Broadcast signals emitted to the host runtime.

use serde::{Deserialize, Serialize};

/// A global event the host runtime reacts to (HUD refresh, sound, dialogue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// Maximum health increased.
    MaxHpUp,
    /// Health refilled.
    HeroHealedFull,
    /// A soul vessel was added.
    NewSoulOrb,
    /// Dream essence was collected.
    DreamOrbCollect,
    /// A grub was rescued.
    GrubCry,
    /// Player control is returned after an inspect.
    EndInspect,
    /// The gate prompt cannot be afforded.
    NotEnough,
    /// Acid armour was obtained; acid pools must refresh.
    GetAcidArmour,
}

impl Signal {
    /// The event name as the host runtime spells it.
    pub const fn as_event_name(self) -> &'static str {
        match self {
            Self::MaxHpUp => "MAX HP UP",
            Self::HeroHealedFull => "HERO HEALED FULL",
            Self::NewSoulOrb => "NEW SOUL ORB",
            Self::DreamOrbCollect => "DREAM ORB COLLECT",
            Self::GrubCry => "GRUB CRY",
            Self::EndInspect => "END INSPECT",
            Self::NotEnough => "NOT ENOUGH",
            Self::GetAcidArmour => "GET ACID ARMOUR",
        }
    }
}

impl core::fmt::Display for Signal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_event_name())
    }
}

/// Receiver of broadcast signals.
pub trait SignalSink {
    /// Deliver one signal.
    fn broadcast(&mut self, signal: Signal);
}

impl SignalSink for Vec<Signal> {
    fn broadcast(&mut self, signal: Signal) {
        self.push(signal);
    }
}
