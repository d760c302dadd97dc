//! Player configuration
//!
//! Gesture thresholds are tuned constants, so they live here as parameters
//! rather than being baked into the interpreter.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Drag thresholds, in distance units and units per millisecond.
/// Positive displacement and velocity point downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    /// Displacement below which a release is treated as a tap
    pub tap_distance: f64,
    /// Mini: downward distance that closes the player
    pub mini_close_distance: f64,
    /// Mini: downward release velocity that closes the player
    pub mini_close_velocity: f64,
    /// Mini: upward distance that restores the full player
    pub mini_restore_distance: f64,
    /// Full: downward distance that minimizes on its own
    pub full_minimize_distance: f64,
    /// Full: shorter downward distance that minimizes when flung
    pub full_fling_distance: f64,
    /// Full: release velocity required together with `full_fling_distance`
    pub full_fling_velocity: f64,
    /// Full: upward distance that reveals the related panel
    pub full_reveal_distance: f64,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            tap_distance: 3.0,
            mini_close_distance: 60.0,
            mini_close_velocity: 0.5,
            mini_restore_distance: 40.0,
            full_minimize_distance: 100.0,
            full_fling_distance: 40.0,
            full_fling_velocity: 0.3,
            full_reveal_distance: 60.0,
        }
    }
}

impl GestureThresholds {
    fn validate(&self) -> Result<()> {
        let values = [
            ("tap_distance", self.tap_distance),
            ("mini_close_distance", self.mini_close_distance),
            ("mini_close_velocity", self.mini_close_velocity),
            ("mini_restore_distance", self.mini_restore_distance),
            ("full_minimize_distance", self.full_minimize_distance),
            ("full_fling_distance", self.full_fling_distance),
            ("full_fling_velocity", self.full_fling_velocity),
            ("full_reveal_distance", self.full_reveal_distance),
        ];
        for (name, value) in values {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::config(format!("{name} must be positive, got {value}")));
            }
        }
        if self.full_fling_distance > self.full_minimize_distance {
            return Err(Error::config(
                "full_fling_distance must not exceed full_minimize_distance",
            ));
        }
        Ok(())
    }
}

/// Player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Drag thresholds
    pub gestures: GestureThresholds,
    /// Autoplay countdown start value (whole seconds)
    pub countdown_seconds: u32,
    /// Idle time before the controls overlay hides (milliseconds)
    pub controls_idle_ms: u64,
    /// Play-head polling interval (milliseconds)
    pub position_poll_ms: u64,
    /// How long the skip label stays up (milliseconds)
    pub skip_feedback_ms: u64,
    /// Seconds jumped by skip forward/back
    pub skip_step_seconds: f64,
    /// Destroy and recreate the surface on Full <-> Mini instead of keeping it
    pub recreate_surface_on_mode_change: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            gestures: GestureThresholds::default(),
            countdown_seconds: 2,
            controls_idle_ms: 3000,
            position_poll_ms: 400,
            skip_feedback_ms: 700,
            skip_step_seconds: 10.0,
            recreate_surface_on_mode_change: false,
        }
    }
}

impl PlayerConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PlayerConfig =
            serde_json::from_str(json).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.countdown_seconds == 0 {
            return Err(Error::config("countdown_seconds must be at least 1"));
        }
        if self.position_poll_ms == 0 {
            return Err(Error::config("position_poll_ms must be positive"));
        }
        if self.controls_idle_ms == 0 || self.skip_feedback_ms == 0 {
            return Err(Error::config("overlay timers must be positive"));
        }
        if !self.skip_step_seconds.is_finite() || self.skip_step_seconds <= 0.0 {
            return Err(Error::config("skip_step_seconds must be positive"));
        }
        self.gestures.validate()
    }

    pub fn controls_idle(&self) -> Duration {
        Duration::from_millis(self.controls_idle_ms)
    }

    pub fn position_poll(&self) -> Duration {
        Duration::from_millis(self.position_poll_ms)
    }

    pub fn skip_feedback(&self) -> Duration {
        Duration::from_millis(self.skip_feedback_ms)
    }
}
