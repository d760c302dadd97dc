//! Retrovue Core - Playback coordination for the Retrovue video browser
//!
//! This crate provides the playback logic behind the UI:
//! - Playback state store (active video, play intent, presentation, resume position)
//! - Presentation state machine (closed / mini / full)
//! - Drag-gesture interpretation with distance and velocity thresholds
//! - Autoplay-next countdown with cancel and skip
//! - Cancellable scheduled tasks for every timer the player uses
//! - Catalog provider and the video surface contract
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Retrovue Core                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐          │
//! │  │   Gesture    │  │   Autoplay   │  │   Controls   │          │
//! │  │ Interpreter  │  │  Countdown   │  │   Overlay    │          │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘          │
//! │         │                 │                 │                   │
//! │         └─────────────────┼─────────────────┘                   │
//! │                           │                                     │
//! │                    ┌──────┴──────┐                              │
//! │                    │   Player    │                              │
//! │                    │ Controller  │                              │
//! │                    └──────┬──────┘                              │
//! │                           │                                     │
//! │  ┌──────────────┐  ┌──────┴──────┐  ┌──────────────┐           │
//! │  │   Catalog    │  │  Playback   │  │   Surface    │           │
//! │  │   Provider   │  │    Store    │  │     Slot     │           │
//! │  └──────────────┘  └─────────────┘  └──────────────┘           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod autoplay;
pub mod catalog;
pub mod config;
pub mod controls;
pub mod error;
pub mod gesture;
pub mod player;
pub mod presentation;
pub mod store;
pub mod surface;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod timer;
pub mod types;

pub use autoplay::{AutoplayController, AutoplayCountdown, CountdownStep};
pub use catalog::{CatalogProvider, StaticCatalog};
pub use config::{GestureThresholds, PlayerConfig};
pub use controls::{format_time, ControlAction, ControlsOverlay};
pub use error::{Error, Result};
pub use gesture::{DragRegion, DragRelease, GestureDecision, GestureInterpreter};
pub use player::PlayerController;
pub use presentation::{PresentationMode, Trigger};
pub use store::PlaybackStore;
pub use surface::{SurfaceEvent, SurfaceFactory, SurfaceOptions, SurfaceSlot, VideoSurface};
pub use timer::{Scheduler, SchedulerStats, TaskHandle, TaskKind};
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() {
    tracing::info!(version = VERSION, "Retrovue Core initialized");
}
