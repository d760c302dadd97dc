//! Recording surface for tests
//!
//! [`RecordingFactory`] hands out surfaces that write every command into a
//! shared [`SurfaceLog`]. The log also plays the widget's side: tests set the
//! play head and duration on it and read back what the core asked for.

use crate::surface::{SurfaceFactory, SurfaceOptions, VideoSurface};
use std::cell::RefCell;
use std::rc::Rc;

/// A command received by a recording surface
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Create(String),
    Load(String),
    Play,
    Pause,
    SeekTo(f64),
    Unmute,
    Destroy(String),
}

#[derive(Debug, Default)]
struct LogState {
    calls: Vec<SurfaceCall>,
    current_time: f64,
    duration: f64,
    muted: bool,
    generation: u64,
    created: usize,
    destroyed: usize,
}

/// Shared view of everything recording surfaces did
#[derive(Debug, Clone, Default)]
pub struct SurfaceLog(Rc<RefCell<LogState>>);

impl SurfaceLog {
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.0.borrow().calls.clone()
    }

    /// Number of calls equal to `call`
    pub fn count(&self, call: &SurfaceCall) -> usize {
        self.0.borrow().calls.iter().filter(|c| *c == call).count()
    }

    /// Generation the most recent surface or load was tagged with; events
    /// from the live content carry this value
    pub fn generation(&self) -> u64 {
        self.0.borrow().generation
    }

    pub fn set_time(&self, seconds: f64) {
        self.0.borrow_mut().current_time = seconds;
    }

    pub fn set_duration(&self, seconds: f64) {
        self.0.borrow_mut().duration = seconds;
    }

    pub fn is_muted(&self) -> bool {
        self.0.borrow().muted
    }

    pub fn created(&self) -> usize {
        self.0.borrow().created
    }

    /// Surfaces created and not yet destroyed
    pub fn live_count(&self) -> usize {
        let state = self.0.borrow();
        state.created - state.destroyed
    }

    fn record(&self, call: SurfaceCall) {
        self.0.borrow_mut().calls.push(call);
    }
}

/// Surface that records commands
pub struct RecordingSurface {
    media_id: String,
    log: SurfaceLog,
    destroyed: bool,
}

impl VideoSurface for RecordingSurface {
    fn load(&mut self, media_id: &str, generation: u64) {
        self.media_id = media_id.to_string();
        let mut state = self.log.0.borrow_mut();
        state.current_time = 0.0;
        state.generation = generation;
        state.calls.push(SurfaceCall::Load(media_id.to_string()));
    }

    fn play(&mut self) {
        self.log.record(SurfaceCall::Play);
    }

    fn pause(&mut self) {
        self.log.record(SurfaceCall::Pause);
    }

    fn seek_to(&mut self, seconds: f64) {
        let mut state = self.log.0.borrow_mut();
        state.current_time = seconds;
        state.calls.push(SurfaceCall::SeekTo(seconds));
    }

    fn current_time(&self) -> Option<f64> {
        Some(self.log.0.borrow().current_time)
    }

    fn duration(&self) -> Option<f64> {
        let duration = self.log.0.borrow().duration;
        (duration > 0.0).then_some(duration)
    }

    fn is_muted(&self) -> bool {
        self.log.is_muted()
    }

    fn unmute(&mut self) {
        let mut state = self.log.0.borrow_mut();
        state.muted = false;
        state.calls.push(SurfaceCall::Unmute);
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        let mut state = self.log.0.borrow_mut();
        state.destroyed += 1;
        state.calls.push(SurfaceCall::Destroy(self.media_id.clone()));
    }
}

/// Factory for [`RecordingSurface`]s sharing one log
#[derive(Debug, Clone, Default)]
pub struct RecordingFactory {
    log: SurfaceLog,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the shared log
    pub fn log(&self) -> SurfaceLog {
        self.log.clone()
    }
}

impl SurfaceFactory for RecordingFactory {
    fn create(
        &mut self,
        media_id: &str,
        generation: u64,
        options: SurfaceOptions,
    ) -> Box<dyn VideoSurface> {
        {
            let mut state = self.log.0.borrow_mut();
            state.created += 1;
            state.generation = generation;
            state.current_time = 0.0;
            state.muted = options.muted;
            state.calls.push(SurfaceCall::Create(media_id.to_string()));
        }
        Box::new(RecordingSurface {
            media_id: media_id.to_string(),
            log: self.log.clone(),
            destroyed: false,
        })
    }
}
