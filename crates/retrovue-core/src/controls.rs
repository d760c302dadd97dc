//! Playback controls overlay
//!
//! Keeps the overlay's visibility and the skip-feedback label. Both are
//! timed: the overlay hides after a period of inactivity (only once playback
//! has actually started, so a failed autoplay still shows the play button),
//! and the skip label clears itself after a short flash.

use crate::timer::{Scheduler, TaskHandle, TaskKind};
use std::time::Duration;

/// Keyboard/remote control handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    PlayPause,
    SkipBackward,
    SkipForward,
}

impl ControlAction {
    /// Map a key name to an action
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " | "Space" | "k" => Some(ControlAction::PlayPause),
            "ArrowLeft" | "j" => Some(ControlAction::SkipBackward),
            "ArrowRight" | "l" => Some(ControlAction::SkipForward),
            _ => None,
        }
    }
}

/// Overlay state
#[derive(Debug, Default)]
pub struct ControlsOverlay {
    visible: bool,
    has_started: bool,
    hide_task: Option<TaskHandle>,
    feedback: Option<String>,
    feedback_task: Option<TaskHandle>,
}

impl ControlsOverlay {
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Default::default()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Label of the last skip while it is flashing
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    /// User activity: show the overlay and restart the idle timer
    pub fn touch(&mut self, scheduler: &mut Scheduler, idle: Duration) {
        self.visible = true;
        scheduler.cancel_slot(&mut self.hide_task);
        if self.has_started {
            self.hide_task = Some(scheduler.once(TaskKind::HideControls, idle));
        }
    }

    /// Playback reported it started; from now on the overlay may auto-hide
    pub fn mark_started(&mut self, scheduler: &mut Scheduler, idle: Duration) {
        if !self.has_started {
            self.has_started = true;
            self.touch(scheduler, idle);
        }
    }

    /// Show a skip label for `duration`
    pub fn flash(&mut self, label: impl Into<String>, scheduler: &mut Scheduler, duration: Duration) {
        self.feedback = Some(label.into());
        scheduler.cancel_slot(&mut self.feedback_task);
        self.feedback_task = Some(scheduler.once(TaskKind::SkipFeedback, duration));
    }

    /// Handle a fired overlay task. Returns true if it belonged here.
    pub fn on_task(&mut self, task: TaskHandle) -> bool {
        if self.hide_task == Some(task) {
            self.hide_task = None;
            self.visible = false;
            true
        } else if self.feedback_task == Some(task) {
            self.feedback_task = None;
            self.feedback = None;
            true
        } else {
            false
        }
    }

    /// The full player went away while playback continues: drop both timers
    /// and the label, remember that playback started
    pub fn suspend(&mut self, scheduler: &mut Scheduler) {
        scheduler.cancel_slot(&mut self.hide_task);
        scheduler.cancel_slot(&mut self.feedback_task);
        self.feedback = None;
        self.visible = true;
    }

    /// Cancel both timers and return to the initial state
    pub fn reset(&mut self, scheduler: &mut Scheduler) {
        scheduler.cancel_slot(&mut self.hide_task);
        scheduler.cancel_slot(&mut self.feedback_task);
        *self = Self::new();
    }
}

/// Format seconds as `m:ss`
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 { seconds.floor() as u64 } else { 0 };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Label shown after a skip, e.g. `+10s` or `-10s`
pub fn skip_label(delta: f64) -> String {
    if delta > 0.0 {
        format!("+{}s", delta)
    } else {
        format!("{}s", delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: Duration = Duration::from_millis(3000);

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(59.9), "0:59");
        assert_eq!(format_time(61.0), "1:01");
        assert_eq!(format_time(3725.0), "62:05");
        assert_eq!(format_time(-4.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
    }

    #[test]
    fn test_skip_label() {
        assert_eq!(skip_label(10.0), "+10s");
        assert_eq!(skip_label(-10.0), "-10s");
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(ControlAction::from_key(" "), Some(ControlAction::PlayPause));
        assert_eq!(ControlAction::from_key("ArrowLeft"), Some(ControlAction::SkipBackward));
        assert_eq!(ControlAction::from_key("ArrowRight"), Some(ControlAction::SkipForward));
        assert_eq!(ControlAction::from_key("Enter"), None);
    }

    #[test]
    fn test_no_auto_hide_before_start() {
        let mut scheduler = Scheduler::new();
        let mut overlay = ControlsOverlay::new();

        overlay.touch(&mut scheduler, IDLE);
        assert!(scheduler.is_empty());
        assert!(overlay.is_visible());
    }

    #[test]
    fn test_hides_after_idle_once_started() {
        let mut scheduler = Scheduler::new();
        let mut overlay = ControlsOverlay::new();
        overlay.mark_started(&mut scheduler, IDLE);

        let task = scheduler.pop_due(Duration::from_secs(5)).unwrap();
        assert!(overlay.on_task(task));
        assert!(!overlay.is_visible());

        overlay.touch(&mut scheduler, IDLE);
        assert!(overlay.is_visible());
        assert_eq!(scheduler.active_count(TaskKind::HideControls), 1);
    }

    #[test]
    fn test_touch_restarts_single_timer() {
        let mut scheduler = Scheduler::new();
        let mut overlay = ControlsOverlay::new();
        overlay.mark_started(&mut scheduler, IDLE);
        overlay.touch(&mut scheduler, IDLE);
        overlay.touch(&mut scheduler, IDLE);
        assert_eq!(scheduler.active_count(TaskKind::HideControls), 1);
    }

    #[test]
    fn test_flash_clears() {
        let mut scheduler = Scheduler::new();
        let mut overlay = ControlsOverlay::new();
        overlay.flash("+10s", &mut scheduler, Duration::from_millis(700));
        overlay.flash("+10s", &mut scheduler, Duration::from_millis(700));
        assert_eq!(overlay.feedback(), Some("+10s"));
        assert_eq!(scheduler.active_count(TaskKind::SkipFeedback), 1);

        let task = scheduler.pop_due(Duration::from_secs(1)).unwrap();
        assert!(overlay.on_task(task));
        assert_eq!(overlay.feedback(), None);
    }

    #[test]
    fn test_reset_cancels_timers() {
        let mut scheduler = Scheduler::new();
        let mut overlay = ControlsOverlay::new();
        overlay.mark_started(&mut scheduler, IDLE);
        overlay.flash("-10s", &mut scheduler, Duration::from_millis(700));

        overlay.reset(&mut scheduler);
        assert!(scheduler.is_empty());
        assert!(overlay.is_visible());

        // Not started anymore: activity shows the overlay without arming a hide.
        overlay.touch(&mut scheduler, IDLE);
        assert_eq!(scheduler.active_count(TaskKind::HideControls), 0);
    }

    #[test]
    fn test_suspend_keeps_started_state() {
        let mut scheduler = Scheduler::new();
        let mut overlay = ControlsOverlay::new();
        overlay.mark_started(&mut scheduler, IDLE);
        overlay.flash("+10s", &mut scheduler, Duration::from_millis(700));

        overlay.suspend(&mut scheduler);
        assert!(scheduler.is_empty());
        assert_eq!(overlay.feedback(), None);
        assert!(overlay.is_visible());

        overlay.touch(&mut scheduler, IDLE);
        assert_eq!(scheduler.active_count(TaskKind::HideControls), 1);
    }
}
