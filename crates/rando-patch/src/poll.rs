//! Cooperative polling for unaffordable prompts.
//!
//! When a prompt opens for a gate the player cannot pay, the cost display
//! must be marked insufficient once the dialogue is ready for input. The
//! dialogue reaches that sub-state asynchronously, so a [`PollTask`] is
//! scheduled and checked once per [`PollScheduler::tick`]. At most one task
//! is live per requester, keyed on `(scene, object)` since pickup names
//! repeat across scenes.

use rando_types::{ObjectName, PollTaskId, SceneName};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ports::PromptUi;

/// One pending check for a requester's prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollTask {
    /// Task identifier.
    pub id: PollTaskId,
    /// Scene the requester lives in.
    pub scene: SceneName,
    /// Pickup whose prompt is being watched.
    pub requester: ObjectName,
    /// Ticks elapsed since scheduling.
    pub ticks: u64,
}

impl PollTask {
    fn is_for(&self, scene: &SceneName, requester: &ObjectName) -> bool {
        &self.scene == scene && &self.requester == requester
    }
}

/// Something that happened to a task during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PollEvent {
    /// The prompt was marked insufficient; `NOT ENOUGH` must reach the
    /// requester.
    NotEnough {
        /// Scene of the requester.
        scene: SceneName,
        /// Pickup that opened the prompt.
        requester: ObjectName,
    },
    /// The task hit its tick bound without the prompt becoming ready.
    Expired {
        /// Scene of the requester.
        scene: SceneName,
        /// Pickup that opened the prompt.
        requester: ObjectName,
    },
}

/// Drives polling tasks from explicit ticks.
#[derive(Debug, Clone, Default)]
pub struct PollScheduler {
    tasks: Vec<PollTask>,
    max_ticks: Option<u64>,
}

impl PollScheduler {
    /// Create a scheduler. `max_ticks` of `None` polls until cancelled.
    pub const fn new(max_ticks: Option<u64>) -> Self {
        Self {
            tasks: Vec::new(),
            max_ticks,
        }
    }

    /// Schedule a task for `requester` in `scene`, or return the live one.
    pub fn schedule(&mut self, scene: &SceneName, requester: &ObjectName) -> PollTaskId {
        if let Some(existing) = self.tasks.iter().find(|t| t.is_for(scene, requester)) {
            debug!(scene = %scene, requester = %requester, task = %existing.id, "Poll task already live");
            return existing.id;
        }
        let task = PollTask {
            id: PollTaskId::new(),
            scene: scene.clone(),
            requester: requester.clone(),
            ticks: 0,
        };
        let id = task.id;
        debug!(scene = %scene, requester = %requester, task = %id, "Poll task scheduled");
        self.tasks.push(task);
        id
    }

    /// Cancel the live task for `requester` in `scene`. Returns whether one
    /// existed.
    pub fn cancel(&mut self, scene: &SceneName, requester: &ObjectName) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.is_for(scene, requester));
        let cancelled = self.tasks.len() < before;
        if cancelled {
            debug!(scene = %scene, requester = %requester, "Poll task cancelled");
        }
        cancelled
    }

    /// Drop every live task.
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    /// Whether a task is live for `requester` in `scene`.
    pub fn is_pending(&self, scene: &SceneName, requester: &ObjectName) -> bool {
        self.tasks.iter().any(|t| t.is_for(scene, requester))
    }

    /// Number of live tasks.
    pub const fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no tasks are live.
    pub const fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run one scheduling step against the prompt.
    ///
    /// Completed and expired tasks are removed before this returns, so their
    /// effects are visible to the next tick's processing.
    pub fn tick(&mut self, ui: &mut dyn PromptUi) -> Vec<PollEvent> {
        let mut events = Vec::new();
        let max_ticks = self.max_ticks;
        self.tasks.retain_mut(|task| {
            task.ticks = task.ticks.saturating_add(1);
            if ui.is_ready_for_input() {
                ui.mark_insufficient();
                info!(
                    scene = %task.scene,
                    requester = %task.requester,
                    ticks = task.ticks,
                    "Prompt marked insufficient"
                );
                events.push(PollEvent::NotEnough {
                    scene: task.scene.clone(),
                    requester: task.requester.clone(),
                });
                return false;
            }
            if max_ticks.is_some_and(|max| task.ticks >= max) {
                warn!(
                    scene = %task.scene,
                    requester = %task.requester,
                    ticks = task.ticks,
                    "Poll task expired"
                );
                events.push(PollEvent::Expired {
                    scene: task.scene.clone(),
                    requester: task.requester.clone(),
                });
                return false;
            }
            true
        });
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Prompt that becomes ready after a fixed number of readiness checks.
    #[derive(Default)]
    struct SlowPrompt {
        ready_after: u32,
        checks: core::cell::Cell<u32>,
        insufficient: bool,
    }

    impl PromptUi for SlowPrompt {
        fn show(&mut self, _text: &str, _toll: u32) {}

        fn is_ready_for_input(&self) -> bool {
            let seen = self.checks.get().saturating_add(1);
            self.checks.set(seen);
            seen > self.ready_after
        }

        fn mark_insufficient(&mut self) {
            self.insufficient = true;
        }

        fn close(&mut self) {}
    }

    fn scene() -> SceneName {
        SceneName::from("RestingGrounds_07")
    }

    #[test]
    fn one_task_per_requester() {
        let mut scheduler = PollScheduler::new(None);
        let shiny = ObjectName::from("Shiny_12");
        let first = scheduler.schedule(&scene(), &shiny);
        let second = scheduler.schedule(&scene(), &shiny);
        assert_eq!(first, second);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn same_name_in_other_scene_is_separate() {
        let mut scheduler = PollScheduler::new(None);
        let shiny = ObjectName::from("Shiny Item");
        let town = SceneName::from("Town");
        let first = scheduler.schedule(&scene(), &shiny);
        let second = scheduler.schedule(&town, &shiny);
        assert_ne!(first, second);
        assert_eq!(scheduler.len(), 2);

        assert!(scheduler.cancel(&town, &shiny));
        assert!(scheduler.is_pending(&scene(), &shiny));
        assert!(!scheduler.is_pending(&town, &shiny));
    }

    #[test]
    fn fires_not_enough_once_ready() {
        let mut scheduler = PollScheduler::new(None);
        let mut ui = SlowPrompt {
            ready_after: 2,
            ..SlowPrompt::default()
        };
        let shiny = ObjectName::from("Shiny_12");
        scheduler.schedule(&scene(), &shiny);

        assert!(scheduler.tick(&mut ui).is_empty());
        assert!(scheduler.tick(&mut ui).is_empty());
        let events = scheduler.tick(&mut ui);
        assert_eq!(events, vec![PollEvent::NotEnough {
                scene: scene(),
                requester: shiny
            }]);
        assert!(ui.insufficient);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn unbounded_task_waits_forever() {
        let mut scheduler = PollScheduler::new(None);
        let mut ui = SlowPrompt {
            ready_after: u32::MAX,
            ..SlowPrompt::default()
        };
        scheduler.schedule(&scene(), &ObjectName::from("Shiny"));
        for _ in 0..100 {
            assert!(scheduler.tick(&mut ui).is_empty());
        }
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn bounded_task_expires() {
        let mut scheduler = PollScheduler::new(Some(3));
        let mut ui = SlowPrompt {
            ready_after: u32::MAX,
            ..SlowPrompt::default()
        };
        let shiny = ObjectName::from("Shiny");
        scheduler.schedule(&scene(), &shiny);
        scheduler.tick(&mut ui);
        scheduler.tick(&mut ui);
        let events = scheduler.tick(&mut ui);
        assert_eq!(events, vec![PollEvent::Expired {
                scene: scene(),
                requester: shiny
            }]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn cancel_removes_task() {
        let mut scheduler = PollScheduler::new(None);
        let shiny = ObjectName::from("Shiny");
        scheduler.schedule(&scene(), &shiny);
        assert!(scheduler.cancel(&scene(), &shiny));
        assert!(!scheduler.cancel(&scene(), &shiny));
        assert!(!scheduler.is_pending(&scene(), &shiny));
    }
}
