//! Gesture Interpreter
//!
//! Turns a vertical drag, evaluated once at release, into a discrete
//! decision. Distance and velocity thresholds are independent: either one is
//! enough. Near-zero displacements are taps and never transition.

use crate::{config::GestureThresholds, presentation::PresentationMode, store::PlaybackStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Where the drag happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragRegion {
    /// The docked mini-player bar
    MiniPlayer,
    /// The video area of the full player
    FullSurface,
    /// Anywhere else on the full page (title, related list)
    FullPage,
}

/// A finished drag. Positive values point downward; velocity is in units/ms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragRelease {
    /// Monotonic id from the input layer; older releases are discarded
    pub sequence: u64,
    pub region: DragRegion,
    pub displacement: f64,
    pub velocity: f64,
}

/// What a release asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureDecision {
    None,
    Minimize,
    Restore,
    Close,
    /// Open the related-videos panel of the full player
    RevealRelated,
}

/// Drag-release interpreter
#[derive(Debug, Clone, Default)]
pub struct GestureInterpreter {
    thresholds: GestureThresholds,
    last_sequence: Option<u64>,
}

impl GestureInterpreter {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self {
            thresholds,
            last_sequence: None,
        }
    }

    pub fn thresholds(&self) -> &GestureThresholds {
        &self.thresholds
    }

    /// Decide without side effects
    pub fn evaluate(&self, mode: PresentationMode, release: &DragRelease) -> GestureDecision {
        let t = &self.thresholds;
        let d = release.displacement;
        let v = release.velocity;

        if !d.is_finite() || d.abs() < t.tap_distance {
            return GestureDecision::None;
        }
        let v = if v.is_finite() { v } else { 0.0 };

        match (mode, release.region) {
            (PresentationMode::Mini, DragRegion::MiniPlayer) => {
                if d > t.mini_close_distance || v > t.mini_close_velocity {
                    GestureDecision::Close
                } else if d < -t.mini_restore_distance {
                    GestureDecision::Restore
                } else {
                    GestureDecision::None
                }
            }
            (PresentationMode::Full, DragRegion::FullSurface) => {
                if d > t.full_minimize_distance
                    || (d > t.full_fling_distance && v > t.full_fling_velocity)
                {
                    GestureDecision::Minimize
                } else if d < -t.full_reveal_distance {
                    GestureDecision::RevealRelated
                } else {
                    GestureDecision::None
                }
            }
            _ => GestureDecision::None,
        }
    }

    /// Decide, discarding releases that are not newer than the last one seen
    pub fn interpret(&mut self, mode: PresentationMode, release: &DragRelease) -> GestureDecision {
        if self.last_sequence.is_some_and(|last| release.sequence <= last) {
            debug!(sequence = release.sequence, "Stale drag release discarded");
            return GestureDecision::None;
        }
        self.last_sequence = Some(release.sequence);
        self.evaluate(mode, release)
    }

    /// Interpret a release against the store's mode and apply the resulting
    /// transition. `RevealRelated` is returned for the caller to handle.
    pub fn apply(&mut self, release: &DragRelease, store: &mut PlaybackStore) -> GestureDecision {
        let mode = store.presentation_mode();
        let decision = self.interpret(mode, release);

        let changed = match decision {
            GestureDecision::Minimize => store.minimize(),
            GestureDecision::Restore => store.restore(),
            GestureDecision::Close => store.close(),
            GestureDecision::RevealRelated | GestureDecision::None => false,
        };

        if decision != GestureDecision::None {
            info!(
                ?decision,
                %mode,
                displacement = release.displacement,
                velocity = release.velocity,
                changed,
                "Drag release"
            );
        }
        decision
    }
}
