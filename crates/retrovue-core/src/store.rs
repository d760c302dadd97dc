//! Playback State Store
//!
//! Holds the session-lifetime playback state and is its only mutation
//! surface. The store is constructed explicitly and handed to whoever needs
//! it; every change is published on a watch channel for the UI layer.
//!
//! Invariants kept by every action:
//! - no active video ⇔ presentation mode is `Closed`
//! - no active video ⇒ not playing
//! - the resume position is reset whenever the active video changes

use crate::{
    presentation::{PresentationMode, Trigger},
    types::*,
};
use tokio::sync::watch;
use tracing::{debug, info};

/// Playback session state
pub struct PlaybackStore {
    /// Session ID for log correlation
    id: SessionId,
    /// Current state
    state: PlaybackSnapshot,
    /// State change broadcaster
    state_tx: watch::Sender<PlaybackSnapshot>,
}

impl Default for PlaybackStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackStore {
    /// Create a store with empty state
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(PlaybackSnapshot::default());
        let id = SessionId::new();
        info!(session_id = %id, "Playback session created");
        Self {
            id,
            state: PlaybackSnapshot::default(),
            state_tx,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.id
    }

    /// Current read model
    pub fn snapshot(&self) -> &PlaybackSnapshot {
        &self.state
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.state_tx.subscribe()
    }

    pub fn active_video(&self) -> Option<&Video> {
        self.state.active_video.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn presentation_mode(&self) -> PresentationMode {
        self.state.presentation_mode
    }

    pub fn resume_position(&self) -> f64 {
        self.state.resume_position
    }

    /// Open a video in the full player, playing from the start
    pub fn load_video(&mut self, video: Video) -> bool {
        info!(session_id = %self.id, video = %video, "Loading video");
        let next = PlaybackSnapshot {
            active_video: Some(video),
            is_playing: true,
            presentation_mode: self.state.presentation_mode.apply(Trigger::Load),
            resume_position: 0.0,
        };
        self.commit(next, "load")
    }

    /// Flip the desired play state
    pub fn toggle_play(&mut self) -> bool {
        if self.state.active_video.is_none() {
            debug!("toggle_play ignored, nothing loaded");
            return false;
        }
        let mut next = self.state.clone();
        next.is_playing = !next.is_playing;
        self.commit(next, "toggle_play")
    }

    /// Reconcile the desired play state with what the surface reports
    pub fn set_playing(&mut self, playing: bool) -> bool {
        if self.state.active_video.is_none() {
            debug!(playing, "set_playing ignored, nothing loaded");
            return false;
        }
        let mut next = self.state.clone();
        next.is_playing = playing;
        self.commit(next, "set_playing")
    }

    /// Record the last observed play head
    pub fn set_resume_position(&mut self, seconds: f64) -> bool {
        if self.state.active_video.is_none() {
            debug!(seconds, "set_resume_position ignored, nothing loaded");
            return false;
        }
        let mut next = self.state.clone();
        next.resume_position = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        self.commit(next, "set_resume_position")
    }

    /// Dock the player
    pub fn minimize(&mut self) -> bool {
        self.transition(Trigger::Minimize)
    }

    /// Return to the full player
    pub fn restore(&mut self) -> bool {
        self.transition(Trigger::Restore)
    }

    /// Reset to the empty state. Safe to call repeatedly.
    pub fn close(&mut self) -> bool {
        self.commit(PlaybackSnapshot::default(), "close")
    }

    fn transition(&mut self, trigger: Trigger) -> bool {
        if self.state.active_video.is_none() {
            debug!(%trigger, "Transition ignored, nothing loaded");
            return false;
        }
        let mut next = self.state.clone();
        next.presentation_mode = self.state.presentation_mode.apply(trigger);
        self.commit(next, trigger.as_str())
    }

    fn commit(&mut self, next: PlaybackSnapshot, action: &'static str) -> bool {
        if next == self.state {
            debug!(action, "No state change");
            return false;
        }

        if next.presentation_mode != self.state.presentation_mode {
            info!(
                session_id = %self.id,
                from = %self.state.presentation_mode,
                to = %next.presentation_mode,
                action,
                "Presentation transition"
            );
        }

        self.state = next;
        self.state_tx.send_replace(self.state.clone());
        true
    }
}
