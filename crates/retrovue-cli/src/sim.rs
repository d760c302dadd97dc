//! Headless playback simulation
//!
//! Drives a [`PlayerController`] against a simulated surface that plays
//! every clip for a fixed length, so autoplay can be followed from a
//! terminal.

use retrovue_core::{
    PlaybackSnapshot, PlayerConfig, PlayerController, StaticCatalog, SurfaceEvent, SurfaceFactory,
    SurfaceOptions, VideoSurface,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// Real time between simulation steps
const STEP: Duration = Duration::from_millis(100);

/// Simulation options
#[derive(Debug, Clone, Copy)]
pub struct SimulationOptions {
    pub plays: usize,
    pub clip_seconds: f64,
    pub speed: u32,
    pub cancel: bool,
}

#[derive(Debug, Default)]
struct SimState {
    media_id: Option<String>,
    generation: u64,
    live: bool,
    playing: bool,
    muted: bool,
    position: f64,
    clip_seconds: f64,
    events: VecDeque<(u64, SurfaceEvent)>,
}

impl SimState {
    fn emit(&mut self, event: SurfaceEvent) {
        if self.live {
            self.events.push_back((self.generation, event));
        }
    }
}

/// Surface that plays for a fixed clip length
pub struct SimSurface {
    state: Rc<RefCell<SimState>>,
}

impl VideoSurface for SimSurface {
    fn load(&mut self, media_id: &str, generation: u64) {
        let mut state = self.state.borrow_mut();
        state.media_id = Some(media_id.to_string());
        state.generation = generation;
        state.position = 0.0;
        state.playing = false;
    }

    fn play(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.position >= state.clip_seconds {
            state.position = 0.0;
        }
        state.playing = true;
        state.emit(SurfaceEvent::Playing);
    }

    fn pause(&mut self) {
        let mut state = self.state.borrow_mut();
        state.playing = false;
        state.emit(SurfaceEvent::Paused);
    }

    fn seek_to(&mut self, seconds: f64) {
        let mut state = self.state.borrow_mut();
        state.position = seconds.clamp(0.0, state.clip_seconds);
    }

    fn current_time(&self) -> Option<f64> {
        Some(self.state.borrow().position)
    }

    fn duration(&self) -> Option<f64> {
        Some(self.state.borrow().clip_seconds)
    }

    fn is_muted(&self) -> bool {
        self.state.borrow().muted
    }

    fn unmute(&mut self) {
        self.state.borrow_mut().muted = false;
    }

    fn destroy(&mut self) {
        let mut state = self.state.borrow_mut();
        state.live = false;
        state.playing = false;
        state.events.clear();
    }
}

/// Creates [`SimSurface`]s over one shared state
pub struct SimFactory {
    state: Rc<RefCell<SimState>>,
}

impl SimFactory {
    pub fn new(clip_seconds: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(SimState {
                clip_seconds,
                ..SimState::default()
            })),
        }
    }

    fn handle(&self) -> Rc<RefCell<SimState>> {
        Rc::clone(&self.state)
    }
}

impl SurfaceFactory for SimFactory {
    fn create(
        &mut self,
        media_id: &str,
        generation: u64,
        options: SurfaceOptions,
    ) -> Box<dyn VideoSurface> {
        {
            let mut state = self.state.borrow_mut();
            state.media_id = Some(media_id.to_string());
            state.generation = generation;
            state.live = true;
            state.playing = false;
            state.muted = options.muted;
            state.position = 0.0;
            state.events.clear();
            state.emit(SurfaceEvent::Ready);
        }
        debug!(media_id, generation, "Simulated surface created");
        Box::new(SimSurface {
            state: Rc::clone(&self.state),
        })
    }
}

/// What a simulation step observed
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    NowPlaying(String),
    Countdown { seconds: u32, next: String },
    Ended(String),
    Cancelled,
}

/// Controller plus simulated surface, stepped in simulated time
pub struct Simulation {
    controller: PlayerController<StaticCatalog, SimFactory>,
    surface: Rc<RefCell<SimState>>,
    updates: watch::Receiver<PlaybackSnapshot>,
    last_countdown: Option<u32>,
    cancel: bool,
    ended: usize,
}

impl Simulation {
    pub fn new(catalog: StaticCatalog, config: PlayerConfig, clip_seconds: f64, cancel: bool) -> Self {
        let factory = SimFactory::new(clip_seconds);
        let surface = factory.handle();
        let controller = PlayerController::new(config, catalog, factory);
        let updates = controller.subscribe();
        Self {
            controller,
            surface,
            updates,
            last_countdown: None,
            cancel,
            ended: 0,
        }
    }

    pub fn start(&mut self, id: &str) -> retrovue_core::Result<()> {
        self.controller.select_by_id(id)
    }

    pub fn ended(&self) -> usize {
        self.ended
    }

    /// Whether anything is left to happen
    pub fn is_idle(&self) -> bool {
        let surface = self.surface.borrow();
        !surface.playing
            && surface.events.is_empty()
            && self.controller.countdown_remaining().is_none()
    }

    /// Advance the surface and the controller by `dt`
    pub fn step(&mut self, dt: Duration) -> Vec<Progress> {
        let mut progress = Vec::new();

        {
            let mut surface = self.surface.borrow_mut();
            if surface.live && surface.playing {
                surface.position += dt.as_secs_f64();
                if surface.position >= surface.clip_seconds {
                    surface.position = surface.clip_seconds;
                    surface.playing = false;
                    surface.emit(SurfaceEvent::Ended);
                }
            }
        }

        // Dispatching can queue further events, e.g. Ready -> play() -> Playing.
        loop {
            let event = self.surface.borrow_mut().events.pop_front();
            let Some((generation, event)) = event else { break };
            if event == SurfaceEvent::Ended {
                self.ended += 1;
                if let Some(video) = self.controller.snapshot().active_video.as_ref() {
                    progress.push(Progress::Ended(video.id.clone()));
                }
            }
            self.controller.dispatch(generation, event);
        }

        self.controller.advance(dt);

        if self.updates.has_changed().unwrap_or(false) {
            let snapshot = self.updates.borrow_and_update().clone();
            if let Some(video) = snapshot.active_video {
                if progress.last() != Some(&Progress::NowPlaying(video.id.clone())) {
                    progress.push(Progress::NowPlaying(video.id));
                }
            }
        }

        let countdown = self.controller.countdown_remaining();
        if countdown != self.last_countdown {
            if let (Some(seconds), Some(next)) = (countdown, self.controller.countdown_target()) {
                progress.push(Progress::Countdown {
                    seconds,
                    next: next.id.clone(),
                });
                if self.cancel && self.controller.cancel_autoplay() {
                    self.cancel = false;
                    progress.push(Progress::Cancelled);
                }
            }
            self.last_countdown = self.controller.countdown_remaining();
        }

        progress
    }

    pub fn finish(&mut self) {
        self.controller.teardown();
    }
}

/// Run a simulated session in real time, scaled by `speed`
pub async fn simulate(
    catalog: StaticCatalog,
    config: PlayerConfig,
    id: &str,
    options: SimulationOptions,
) -> anyhow::Result<()> {
    anyhow::ensure!(options.clip_seconds > 0.0, "clip length must be positive");
    anyhow::ensure!(options.speed > 0, "speed must be positive");

    let mut sim = Simulation::new(catalog, config, options.clip_seconds, options.cancel);
    sim.start(id)?;
    println!("Simulating from {} ({}s clips, {}x)", id, options.clip_seconds, options.speed);

    let dt = STEP * options.speed;
    let mut interval = tokio::time::interval(STEP);
    let mut last_now_playing = None;

    loop {
        interval.tick().await;

        for progress in sim.step(dt) {
            match progress {
                Progress::NowPlaying(id) => {
                    if last_now_playing.as_ref() != Some(&id) {
                        println!("▶ Now playing: {}", id);
                        last_now_playing = Some(id);
                    }
                }
                Progress::Countdown { seconds, next } => {
                    println!("  Up next: {} in {}s", next, seconds);
                }
                Progress::Ended(id) => println!("■ Ended: {}", id),
                Progress::Cancelled => println!("  Autoplay cancelled"),
            }
        }

        if sim.ended() >= options.plays || sim.is_idle() {
            break;
        }
    }

    sim.finish();
    info!(plays = sim.ended(), "Simulation finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = include_str!("../../../data/catalog.json");

    fn simulation(cancel: bool) -> Simulation {
        let catalog = StaticCatalog::from_json(DATASET).unwrap();
        Simulation::new(catalog, PlayerConfig::default(), 1.0, cancel)
    }

    fn run(sim: &mut Simulation, steps: usize) -> Vec<Progress> {
        (0..steps)
            .flat_map(|_| sim.step(Duration::from_millis(500)))
            .collect()
    }

    #[test]
    fn test_autoplay_follows_category() {
        let mut sim = simulation(false);
        sim.start("neon-highway").unwrap();

        let progress = run(&mut sim, 12);
        assert!(progress.contains(&Progress::Ended("neon-highway".into())));
        assert!(progress.contains(&Progress::Countdown {
            seconds: 2,
            next: "chrome-sunset".into()
        }));
        assert!(progress.contains(&Progress::NowPlaying("chrome-sunset".into())));
        assert!(sim.ended() >= 2);
    }

    #[test]
    fn test_cancel_stops_the_session() {
        let mut sim = simulation(true);
        sim.start("castle-16bit").unwrap();

        let progress = run(&mut sim, 12);
        assert!(progress.contains(&Progress::Cancelled));
        assert!(!progress.contains(&Progress::NowPlaying("palette-tricks".into())));
        assert_eq!(sim.ended(), 1);
        assert!(sim.is_idle());
    }

    #[test]
    fn test_destroyed_surface_is_silent() {
        let mut factory = SimFactory::new(2.0);
        let state = factory.handle();
        let mut surface = factory.create("neon-highway", 7, SurfaceOptions::default());
        assert_eq!(state.borrow().events.front(), Some(&(7, SurfaceEvent::Ready)));

        surface.load("chrome-sunset", 8);
        surface.play();
        assert_eq!(state.borrow().events.back(), Some(&(8, SurfaceEvent::Playing)));

        surface.destroy();
        surface.play();
        assert!(state.borrow().events.is_empty());
    }
}
