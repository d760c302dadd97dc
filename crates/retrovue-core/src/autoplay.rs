//! Autoplay Countdown Controller
//!
//! When a video ends in the full player, counts down from a fixed value and
//! then loads the next video of the same category. At most one countdown
//! exists; starting a new one replaces the old one, and every exit path
//! cancels the countdown's task.

use crate::{
    catalog::CatalogProvider,
    store::PlaybackStore,
    timer::{Scheduler, TaskHandle, TaskKind},
    types::Video,
};
use std::time::Duration;
use tracing::{debug, info};

const TICK: Duration = Duration::from_secs(1);

/// An active countdown
#[derive(Debug, Clone)]
pub struct AutoplayCountdown {
    remaining_seconds: u32,
    target: Video,
    task: TaskHandle,
}

impl AutoplayCountdown {
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn target(&self) -> &Video {
        &self.target
    }
}

/// Result of one countdown tick
#[derive(Debug, Clone, PartialEq)]
pub enum CountdownStep {
    /// Still counting; seconds left
    Remaining(u32),
    /// Reached zero and loaded the target
    Advanced(Video),
}

/// Owns the (at most one) autoplay countdown
#[derive(Debug)]
pub struct AutoplayController {
    initial_seconds: u32,
    active: Option<AutoplayCountdown>,
}

impl AutoplayController {
    pub fn new(initial_seconds: u32) -> Self {
        Self {
            initial_seconds: initial_seconds.max(1),
            active: None,
        }
    }

    pub fn countdown(&self) -> Option<&AutoplayCountdown> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Seconds left, None when inactive
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.active.as_ref().map(|c| c.remaining_seconds)
    }

    /// Start counting down after `ended`. Returns false when the category
    /// has no other video, in which case nothing is scheduled.
    pub fn start(
        &mut self,
        ended: &Video,
        catalog: &dyn CatalogProvider,
        scheduler: &mut Scheduler,
    ) -> bool {
        self.cancel(scheduler);

        let Some(target) = catalog.next_in_category(ended) else {
            debug!(video = %ended, "No next video in category, autoplay skipped");
            return false;
        };

        info!(
            ended = %ended,
            next = %target,
            seconds = self.initial_seconds,
            "Autoplay countdown started"
        );

        let task = scheduler.repeating(TaskKind::AutoplayCountdown, TICK);
        self.active = Some(AutoplayCountdown {
            remaining_seconds: self.initial_seconds,
            target,
            task,
        });
        true
    }

    /// Handle a fired countdown task. Tasks that are not the active
    /// countdown's are ignored.
    pub fn tick(
        &mut self,
        task: TaskHandle,
        store: &mut PlaybackStore,
        scheduler: &mut Scheduler,
    ) -> Option<CountdownStep> {
        let countdown = self.active.as_mut().filter(|c| c.task == task)?;

        countdown.remaining_seconds = countdown.remaining_seconds.saturating_sub(1);
        if countdown.remaining_seconds > 0 {
            debug!(remaining = countdown.remaining_seconds, "Autoplay countdown tick");
            return Some(CountdownStep::Remaining(countdown.remaining_seconds));
        }

        self.advance(store, scheduler).map(CountdownStep::Advanced)
    }

    /// Load the target immediately, bypassing the remaining countdown
    pub fn skip_now(
        &mut self,
        store: &mut PlaybackStore,
        scheduler: &mut Scheduler,
    ) -> Option<Video> {
        self.advance(store, scheduler)
    }

    /// Drop the countdown, leaving playback where it is. Safe to call
    /// repeatedly.
    pub fn cancel(&mut self, scheduler: &mut Scheduler) -> bool {
        match self.active.take() {
            Some(countdown) => {
                scheduler.cancel(countdown.task);
                info!(next = %countdown.target, "Autoplay countdown cancelled");
                true
            }
            None => false,
        }
    }

    fn advance(&mut self, store: &mut PlaybackStore, scheduler: &mut Scheduler) -> Option<Video> {
        let countdown = self.active.take()?;
        scheduler.cancel(countdown.task);

        info!(next = %countdown.target, "Autoplay advancing");
        store.set_resume_position(0.0);
        store.load_video(countdown.target.clone());
        Some(countdown.target)
    }
}
