//! Presentation state machine
//!
//! Exactly one of the three presentations is rendered at a time. `Mini` is a
//! docked continuation of the same playback, not a new session.

use serde::{Deserialize, Serialize};

/// Which presentation of the player is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationMode {
    /// Nothing loaded, no player visible
    #[default]
    Closed,
    /// Docked mini-player
    Mini,
    /// Full-page player
    Full,
}

/// Inputs of the presentation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// A video was selected
    Load,
    /// Explicit minimize or drag-down from the full player
    Minimize,
    /// Tap or drag-up on the mini player
    Restore,
    /// Explicit close or drag-down past the close threshold
    Close,
}

impl PresentationMode {
    /// Apply a trigger. Total over all (mode, trigger) pairs; pairs without a
    /// transition map to the current mode.
    pub fn apply(self, trigger: Trigger) -> PresentationMode {
        use PresentationMode::*;
        match (self, trigger) {
            (_, Trigger::Load) => Full,
            (Full, Trigger::Minimize) => Mini,
            (Mini, Trigger::Restore) => Full,
            (Full | Mini, Trigger::Close) => Closed,
            (mode, _) => mode,
        }
    }

    /// Check whether the trigger changes the mode
    pub fn can_apply(self, trigger: Trigger) -> bool {
        self.apply(trigger) != self
    }
}

impl Trigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::Load => "load",
            Trigger::Minimize => "minimize",
            Trigger::Restore => "restore",
            Trigger::Close => "close",
        }
    }
}

impl std::fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresentationMode::Closed => write!(f, "closed"),
            PresentationMode::Mini => write!(f, "mini"),
            PresentationMode::Full => write!(f, "full"),
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
