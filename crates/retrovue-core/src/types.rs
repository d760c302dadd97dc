//! Core types for Retrovue

use crate::presentation::PresentationMode;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Unique identifier for a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog entry, normalized from the dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Unique identifier within the catalog (dataset slug)
    pub id: String,
    /// Display title
    pub title: String,
    /// Human-readable category name
    pub category: String,
    /// Category key
    pub category_slug: String,
    /// Thumbnail reference
    pub thumbnail_url: String,
    /// Identifier handed to the video surface
    pub media_id: String,
    /// Full embed URL
    pub media_url: Url,
    /// Human-readable duration, e.g. "3:45" (may be empty)
    pub duration: String,
}

impl Video {
    /// True if both videos belong to the same category
    pub fn same_category(&self, other: &Video) -> bool {
        self.category_slug == other.category_slug
    }
}

impl std::fmt::Display for Video {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.title, self.id)
    }
}

/// Category with its videos, in catalog order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub name: String,
    pub slug: String,
    pub icon_url: String,
    pub videos: Vec<Video>,
}

/// Read model of the playback session handed to the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    /// Currently active video (None = nothing loaded)
    pub active_video: Option<Video>,
    /// Desired play state
    pub is_playing: bool,
    /// Which presentation is rendered
    pub presentation_mode: PresentationMode,
    /// Seconds to seek to when a surface is (re)created
    pub resume_position: f64,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            active_video: None,
            is_playing: false,
            presentation_mode: PresentationMode::Closed,
            resume_position: 0.0,
        }
    }
}

impl PlaybackSnapshot {
    /// Media id of the active video, if any
    pub fn active_media_id(&self) -> Option<&str> {
        self.active_video.as_ref().map(|v| v.media_id.as_str())
    }
}
