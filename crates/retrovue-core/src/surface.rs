//! Video Surface contract
//!
//! The embeddable playback widget is an external collaborator. The core only
//! talks to it through [`VideoSurface`], creates it through a
//! [`SurfaceFactory`], and learns about its state through [`SurfaceEvent`]s.
//!
//! [`SurfaceSlot`] holds the single live instance. Commands issued before the
//! surface reported `Ready`, or while no surface exists, are dropped.
//!
//! Every mount and retarget starts a new generation. The surface is told the
//! generation it serves and must tag its events with it, so the controller can
//! drop events that belong to content it has already moved away from.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Events emitted by the video surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceEvent {
    Ready,
    Playing,
    Paused,
    Ended,
}

impl std::fmt::Display for SurfaceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceEvent::Ready => write!(f, "ready"),
            SurfaceEvent::Playing => write!(f, "playing"),
            SurfaceEvent::Paused => write!(f, "paused"),
            SurfaceEvent::Ended => write!(f, "ended"),
        }
    }
}

/// Options a new surface is created with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceOptions {
    /// Start muted; the controller unmutes on the first `Playing`
    pub muted: bool,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self { muted: true }
    }
}

/// The embeddable playback widget
pub trait VideoSurface {
    /// Switch to another media item. Events from now on carry `generation`.
    fn load(&mut self, media_id: &str, generation: u64);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek_to(&mut self, seconds: f64);
    /// Current play head, if the widget can report one
    fn current_time(&self) -> Option<f64>;
    /// Media duration, if known yet
    fn duration(&self) -> Option<f64>;
    fn is_muted(&self) -> bool;
    fn unmute(&mut self);
    /// Release the widget and everything it holds
    fn destroy(&mut self);
}

/// Creates surfaces
pub trait SurfaceFactory {
    /// Create a surface for `media_id` whose events carry `generation`
    fn create(
        &mut self,
        media_id: &str,
        generation: u64,
        options: SurfaceOptions,
    ) -> Box<dyn VideoSurface>;
}

struct LiveSurface {
    surface: Box<dyn VideoSurface>,
    media_id: String,
    ready: bool,
}

/// Holder of the one live surface
#[derive(Default)]
pub struct SurfaceSlot {
    live: Option<LiveSurface>,
    generation: u64,
}

impl SurfaceSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a surface built by `create` for the next generation. The
    /// previous one is destroyed first.
    pub fn mount(
        &mut self,
        media_id: &str,
        create: impl FnOnce(u64) -> Box<dyn VideoSurface>,
    ) {
        self.release();
        self.generation += 1;
        let surface = create(self.generation);
        info!(media_id, generation = self.generation, "Surface mounted");
        self.live = Some(LiveSurface {
            surface,
            media_id: media_id.to_string(),
            ready: false,
        });
    }

    /// Point the live surface at other content. Returns false if there is no
    /// ready surface to retarget.
    pub fn retarget(&mut self, media_id: &str) -> bool {
        match self.live.as_mut() {
            Some(live) if live.ready => {
                self.generation += 1;
                live.surface.load(media_id, self.generation);
                live.media_id = media_id.to_string();
                info!(media_id, generation = self.generation, "Surface retargeted");
                true
            }
            _ => false,
        }
    }

    /// Destroy the live surface, if any. Returns the last play head it reported.
    pub fn release(&mut self) -> Option<f64> {
        let mut live = self.live.take()?;
        let position = if live.ready { live.surface.current_time() } else { None };
        live.surface.destroy();
        info!(media_id = %live.media_id, "Surface destroyed");
        position
    }

    /// Mark the live surface ready. Returns false if there is none.
    pub fn mark_ready(&mut self) -> bool {
        match self.live.as_mut() {
            Some(live) => {
                live.ready = true;
                true
            }
            None => false,
        }
    }

    /// Run `f` against the surface if it exists and is ready
    pub fn with_ready<R>(&mut self, f: impl FnOnce(&mut dyn VideoSurface) -> R) -> Option<R> {
        match self.live.as_mut() {
            Some(live) if live.ready => Some(f(live.surface.as_mut())),
            Some(_) => {
                debug!("Surface not ready, command dropped");
                None
            }
            None => {
                debug!("No surface, command dropped");
                None
            }
        }
    }

    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.live.as_ref().is_some_and(|l| l.ready)
    }

    /// Media the live surface shows
    pub fn media_id(&self) -> Option<&str> {
        self.live.as_ref().map(|l| l.media_id.as_str())
    }

    /// Bumped on every mount and retarget
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether an event tagged with `generation` comes from the live surface
    /// and its current content
    pub fn is_current(&self, generation: u64) -> bool {
        self.is_live() && generation == self.generation
    }
}
