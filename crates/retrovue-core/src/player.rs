//! Player Controller - single dispatch point for the playback UI
//!
//! Coordinates:
//! - the playback store (the only place state is mutated)
//! - the one live video surface and its hand-off between presentations
//! - drag gestures, surface events and timer ticks
//! - the autoplay countdown and the controls overlay
//!
//! Every entry point mutates the store first and then calls `sync`, which
//! brings the surface and the timers in line with the new state. That
//! ordering means a `load_video` is always seen by the countdown teardown
//! before any timer for the new video is started.

use crate::{
    autoplay::{AutoplayController, CountdownStep},
    catalog::CatalogProvider,
    config::PlayerConfig,
    controls::{skip_label, ControlAction, ControlsOverlay},
    gesture::{DragRelease, GestureDecision, GestureInterpreter},
    presentation::PresentationMode,
    store::PlaybackStore,
    surface::{SurfaceEvent, SurfaceFactory, SurfaceOptions, SurfaceSlot},
    timer::{Scheduler, TaskHandle, TaskKind},
    types::*,
    Error, Result,
};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// What `sync` last saw of the store
#[derive(Debug, Clone, Default)]
struct Observed {
    video_id: Option<String>,
    mode: PresentationMode,
}

/// Playback controller for one session
pub struct PlayerController<C, F> {
    config: PlayerConfig,
    store: PlaybackStore,
    catalog: C,
    factory: F,
    slot: SurfaceSlot,
    scheduler: Scheduler,
    gestures: GestureInterpreter,
    autoplay: AutoplayController,
    controls: ControlsOverlay,
    poll_task: Option<TaskHandle>,
    /// Related-videos panel of the full player
    show_related: bool,
    /// Play head shown by the overlay
    current_time: f64,
    /// Duration shown by the overlay (0 = unknown)
    duration: f64,
    /// Last play/pause command sent to the surface
    commanded: Option<bool>,
    /// The surface's content played to its end
    ended: bool,
    observed: Observed,
}

impl<C: CatalogProvider, F: SurfaceFactory> PlayerController<C, F> {
    /// Create a controller with an empty session
    pub fn new(config: PlayerConfig, catalog: C, factory: F) -> Self {
        Self {
            gestures: GestureInterpreter::new(config.gestures.clone()),
            autoplay: AutoplayController::new(config.countdown_seconds),
            config,
            store: PlaybackStore::new(),
            catalog,
            factory,
            slot: SurfaceSlot::new(),
            scheduler: Scheduler::new(),
            controls: ControlsOverlay::new(),
            poll_task: None,
            show_related: false,
            current_time: 0.0,
            duration: 0.0,
            commanded: None,
            ended: false,
            observed: Observed::default(),
        }
    }

    // ---------------------------------------------------------------------
    // Read model
    // ---------------------------------------------------------------------

    pub fn store(&self) -> &PlaybackStore {
        &self.store
    }

    pub fn snapshot(&self) -> &PlaybackSnapshot {
        self.store.snapshot()
    }

    /// Subscribe to session state changes
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.store.subscribe()
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Timer instrumentation
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn countdown_remaining(&self) -> Option<u32> {
        self.autoplay.remaining_seconds()
    }

    pub fn countdown_target(&self) -> Option<&Video> {
        self.autoplay.countdown().map(|c| c.target())
    }

    pub fn show_related(&self) -> bool {
        self.show_related
    }

    /// Videos of the active video's category, excluding it
    pub fn related_videos(&self) -> Vec<Video> {
        self.store
            .active_video()
            .map(|v| self.catalog.related_to(v))
            .unwrap_or_default()
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn controls_visible(&self) -> bool {
        self.controls.is_visible()
    }

    pub fn skip_feedback(&self) -> Option<&str> {
        self.controls.feedback()
    }

    pub fn surface_ready(&self) -> bool {
        self.slot.is_ready()
    }

    /// Generation the live surface's events must carry to be accepted
    pub fn surface_generation(&self) -> u64 {
        self.slot.generation()
    }

    // ---------------------------------------------------------------------
    // UI actions
    // ---------------------------------------------------------------------

    /// Open a video in the full player. Picking the video that just ended
    /// plays it again from the start.
    #[instrument(skip(self, video), fields(video = %video.id))]
    pub fn select_video(&mut self, video: Video) {
        self.autoplay.cancel(&mut self.scheduler);
        let replay = self.ended
            && self
                .store
                .active_video()
                .is_some_and(|active| active.id == video.id);

        self.store.load_video(video);
        if replay && self.slot.with_ready(|surface| surface.seek_to(0.0)).is_some() {
            debug!("Replaying ended video");
            self.current_time = 0.0;
            self.ended = false;
        }
        self.sync();
    }

    /// Open a catalog video by id
    pub fn select_by_id(&mut self, id: &str) -> Result<()> {
        let video = self
            .catalog
            .find(id)
            .cloned()
            .ok_or_else(|| Error::UnknownVideo(id.to_string()))?;
        self.select_video(video);
        Ok(())
    }

    pub fn toggle_play(&mut self) {
        self.store.toggle_play();
        self.user_activity();
        self.sync();
    }

    pub fn minimize(&mut self) {
        self.store.minimize();
        self.sync();
    }

    pub fn restore(&mut self) {
        self.store.restore();
        self.sync();
    }

    /// Close the player. Safe to call repeatedly.
    pub fn close(&mut self) {
        self.store.close();
        self.sync();
    }

    pub fn toggle_related(&mut self) {
        if self.store.presentation_mode() == PresentationMode::Full {
            self.show_related = !self.show_related;
        }
    }

    /// Pointer or touch activity over the full player
    pub fn user_activity(&mut self) {
        if self.store.presentation_mode() != PresentationMode::Full {
            return;
        }
        self.controls
            .touch(&mut self.scheduler, self.config.controls_idle());
    }

    /// Keyboard shortcut; only the full player listens
    pub fn handle_key(&mut self, action: ControlAction) {
        if self.store.presentation_mode() != PresentationMode::Full {
            debug!(?action, "Key ignored outside the full player");
            return;
        }
        match action {
            ControlAction::PlayPause => self.toggle_play(),
            ControlAction::SkipBackward => self.skip(-self.config.skip_step_seconds),
            ControlAction::SkipForward => self.skip(self.config.skip_step_seconds),
        }
    }

    /// Jump relative to the current play head, never before 0
    pub fn skip(&mut self, delta: f64) {
        let target = self.slot.with_ready(|surface| {
            let target = (surface.current_time().unwrap_or(0.0) + delta).max(0.0);
            surface.seek_to(target);
            target
        });

        if let Some(target) = target {
            self.current_time = target;
            if self.store.presentation_mode() == PresentationMode::Full {
                self.controls.flash(
                    skip_label(delta),
                    &mut self.scheduler,
                    self.config.skip_feedback(),
                );
                self.user_activity();
            }
        }
    }

    /// Seek from the scrubber
    pub fn seek(&mut self, seconds: f64) {
        let target = seconds.max(0.0);
        if self.slot.with_ready(|surface| surface.seek_to(target)).is_some() {
            self.current_time = target;
        }
    }

    /// Stop the countdown and stay on the ended video
    pub fn cancel_autoplay(&mut self) -> bool {
        self.autoplay.cancel(&mut self.scheduler)
    }

    /// Advance to the countdown target right away
    pub fn skip_now(&mut self) -> bool {
        let advanced = self
            .autoplay
            .skip_now(&mut self.store, &mut self.scheduler)
            .is_some();
        self.sync();
        advanced
    }

    // ---------------------------------------------------------------------
    // Inputs
    // ---------------------------------------------------------------------

    /// A drag ended
    #[instrument(skip(self))]
    pub fn release_drag(&mut self, release: DragRelease) -> GestureDecision {
        let decision = self.gestures.apply(&release, &mut self.store);
        if decision == GestureDecision::RevealRelated {
            self.show_related = true;
        }
        self.sync();
        decision
    }

    /// An event from the surface, tagged with the generation it was issued
    /// under. Events from a released surface or from content the surface
    /// has since been moved away from are dropped.
    #[instrument(skip(self))]
    pub fn dispatch(&mut self, generation: u64, event: SurfaceEvent) {
        if !self.slot.is_live() {
            debug!(%event, "Event without a live surface ignored");
            return;
        }
        if !self.slot.is_current(generation) {
            debug!(
                %event,
                generation,
                current = self.slot.generation(),
                "Stale surface event discarded"
            );
            return;
        }

        match event {
            SurfaceEvent::Ready => self.on_ready(),
            SurfaceEvent::Playing => {
                self.ended = false;
                self.store.set_playing(true);
                self.commanded = Some(true);
                self.controls
                    .mark_started(&mut self.scheduler, self.config.controls_idle());
                self.slot.with_ready(|surface| {
                    if surface.is_muted() {
                        surface.unmute();
                    }
                });
                self.refresh_duration();
            }
            SurfaceEvent::Paused => {
                self.store.set_playing(false);
                self.commanded = Some(false);
            }
            SurfaceEvent::Ended => {
                self.ended = true;
                self.store.set_playing(false);
                self.commanded = Some(false);
                if self.duration > 0.0 {
                    self.current_time = self.duration;
                }
                self.on_ended();
            }
        }
        self.sync();
    }

    /// Let `elapsed` pass, firing due tasks in deadline order
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.scheduler.now() + elapsed;
        while let Some(task) = self.scheduler.pop_due(until) {
            self.on_task(task);
            self.sync();
        }
        self.scheduler.advance_to(until);
    }

    /// The owning view goes away: save the play head, release the surface
    /// and cancel every timer. The session itself survives.
    #[instrument(skip(self))]
    pub fn teardown(&mut self) {
        self.autoplay.cancel(&mut self.scheduler);
        self.unmount_surface(true);
        let leftover = self.scheduler.cancel_all();
        if leftover > 0 {
            warn!(leftover, "Tasks still scheduled at teardown");
        }
        self.show_related = false;
        self.observed = Observed::default();
        info!(session_id = %self.store.session_id(), "Player torn down");
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn on_ready(&mut self) {
        if !self.slot.mark_ready() {
            return;
        }
        self.refresh_duration();

        let resume = self.store.resume_position();
        self.slot.with_ready(|surface| {
            if resume > 0.0 {
                surface.seek_to(resume);
            }
            surface.play();
        });
        if resume > 0.0 {
            self.current_time = resume;
        }
        self.store.set_playing(true);
        self.commanded = Some(true);
        info!(resume, "Surface ready");
    }

    fn on_ended(&mut self) {
        if self.store.presentation_mode() != PresentationMode::Full {
            debug!("Video ended outside the full player, no autoplay");
            return;
        }
        if let Some(video) = self.store.active_video().cloned() {
            self.autoplay
                .start(&video, &self.catalog, &mut self.scheduler);
        }
    }

    fn on_task(&mut self, task: TaskHandle) {
        match task.kind() {
            TaskKind::AutoplayCountdown => {
                match self.autoplay.tick(task, &mut self.store, &mut self.scheduler) {
                    Some(CountdownStep::Advanced(video)) => {
                        info!(video = %video, "Autoplay loaded next video");
                    }
                    Some(CountdownStep::Remaining(_)) | None => {}
                }
            }
            TaskKind::PositionPoll => self.poll_position(task),
            TaskKind::HideControls | TaskKind::SkipFeedback => {
                self.controls.on_task(task);
            }
        }
    }

    fn poll_position(&mut self, task: TaskHandle) {
        if self.poll_task != Some(task) {
            return;
        }
        // The surface may still show content the store has moved away from.
        if self.slot.media_id() != self.store.snapshot().active_media_id() {
            debug!("Position poll for inactive content discarded");
            return;
        }
        let reading = self
            .slot
            .with_ready(|surface| (surface.current_time(), surface.duration()));
        if let Some((time, duration)) = reading {
            self.current_time = time.unwrap_or(0.0);
            if self.duration <= 0.0 {
                self.duration = duration.unwrap_or(0.0);
            }
        }
    }

    fn refresh_duration(&mut self) {
        if let Some(Some(duration)) = self.slot.with_ready(|surface| surface.duration()) {
            if duration > 0.0 {
                self.duration = duration;
            }
        }
    }

    /// Bring surface, timers and local UI state in line with the store
    fn sync(&mut self) {
        let snapshot = self.store.snapshot().clone();
        let video_id = snapshot.active_video.as_ref().map(|v| v.id.clone());
        let mode = snapshot.presentation_mode;

        let previous = std::mem::replace(
            &mut self.observed,
            Observed {
                video_id: video_id.clone(),
                mode,
            },
        );
        let video_changed = previous.video_id != video_id;
        let mode_changed = previous.mode != mode;

        if video_changed || (mode_changed && previous.mode == PresentationMode::Full) {
            self.autoplay.cancel(&mut self.scheduler);
        }
        if mode != PresentationMode::Full {
            self.show_related = false;
        }
        if mode_changed && previous.mode == PresentationMode::Full {
            self.controls.suspend(&mut self.scheduler);
        } else if mode_changed && mode == PresentationMode::Full {
            self.controls
                .touch(&mut self.scheduler, self.config.controls_idle());
        }

        match snapshot.active_video {
            None => {
                if self.slot.is_live() {
                    self.unmount_surface(false);
                }
            }
            Some(ref video) => {
                if !self.slot.is_live() {
                    self.mount_surface(&video.media_id);
                } else if video_changed {
                    self.switch_content(&video.media_id);
                } else if mode_changed && self.config.recreate_surface_on_mode_change {
                    info!(from = %previous.mode, to = %mode, "Recreating surface");
                    self.unmount_surface(true);
                    self.mount_surface(&video.media_id);
                }
            }
        }

        self.sync_play_state();
    }

    fn sync_play_state(&mut self) {
        let desired = self.store.is_playing();
        if self.commanded == Some(desired) {
            return;
        }
        let sent = self.slot.with_ready(|surface| {
            if desired {
                surface.play();
            } else {
                surface.pause();
            }
        });
        if sent.is_some() {
            self.commanded = Some(desired);
        }
    }

    fn mount_surface(&mut self, media_id: &str) {
        let factory = &mut self.factory;
        self.slot.mount(media_id, |generation| {
            factory.create(media_id, generation, SurfaceOptions::default())
        });
        self.reset_surface_state();
        self.poll_task = Some(
            self.scheduler
                .repeating(TaskKind::PositionPoll, self.config.position_poll()),
        );
    }

    fn switch_content(&mut self, media_id: &str) {
        if self.slot.media_id() == Some(media_id) {
            return;
        }
        if self.slot.retarget(media_id) {
            self.current_time = 0.0;
            self.duration = 0.0;
            self.commanded = None;
            self.ended = false;
        } else {
            // Not ready yet: a fresh surface is the only way to switch.
            self.unmount_surface(false);
            self.mount_surface(media_id);
        }
    }

    /// Release the live surface. With `save`, the play head is written back
    /// to the store first, but only if the surface still shows the active
    /// video.
    fn unmount_surface(&mut self, save: bool) {
        let shows_active = self.slot.media_id().is_some()
            && self.slot.media_id() == self.store.snapshot().active_media_id();

        self.scheduler.cancel_slot(&mut self.poll_task);
        self.controls.reset(&mut self.scheduler);

        if let Some(position) = self.slot.release() {
            if save && shows_active && position > 0.0 {
                self.store.set_resume_position(position);
            }
        }
        self.commanded = None;
    }

    fn reset_surface_state(&mut self) {
        self.current_time = 0.0;
        self.duration = 0.0;
        self.commanded = None;
        self.ended = false;
        self.controls.reset(&mut self.scheduler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::gesture::DragRegion;
    use crate::testing::{RecordingFactory, SurfaceCall, SurfaceLog};
    use url::Url;

    fn video(id: &str, category: &str) -> Video {
        Video {
            id: id.to_string(),
            title: id.to_uppercase(),
            category: category.to_string(),
            category_slug: category.to_string(),
            thumbnail_url: String::new(),
            media_id: id.to_string(),
            media_url: Url::parse(&format!("https://www.youtube.com/embed/{id}")).unwrap(),
            duration: String::new(),
        }
    }

    fn controller_with(config: PlayerConfig) -> (PlayerController<StaticCatalog, RecordingFactory>, SurfaceLog) {
        let group = |slug: &str, ids: &[&str]| CategoryGroup {
            name: slug.to_string(),
            slug: slug.to_string(),
            icon_url: String::new(),
            videos: ids.iter().map(|id| video(id, slug)).collect(),
        };
        let catalog =
            StaticCatalog::from_groups(vec![group("retro", &["a", "b", "c"]), group("solo", &["s"])])
                .unwrap();
        let factory = RecordingFactory::new();
        let log = factory.log();
        (PlayerController::new(config, catalog, factory), log)
    }

    fn controller() -> (PlayerController<StaticCatalog, RecordingFactory>, SurfaceLog) {
        controller_with(PlayerConfig::default())
    }

    fn drag(sequence: u64, region: DragRegion, displacement: f64, velocity: f64) -> DragRelease {
        DragRelease {
            sequence,
            region,
            displacement,
            velocity,
        }
    }

    /// Deliver an event from the live surface's current content
    fn emit(player: &mut PlayerController<StaticCatalog, RecordingFactory>, event: SurfaceEvent) {
        let generation = player.surface_generation();
        player.dispatch(generation, event);
    }

    fn open(player: &mut PlayerController<StaticCatalog, RecordingFactory>, id: &str) {
        player.select_by_id(id).unwrap();
        emit(player, SurfaceEvent::Ready);
        emit(player, SurfaceEvent::Playing);
    }

    #[test]
    fn test_select_mounts_surface_and_plays_on_ready() {
        let (mut player, log) = controller();
        player.select_by_id("a").unwrap();

        assert_eq!(player.snapshot().presentation_mode, PresentationMode::Full);
        assert_eq!(log.live_count(), 1);
        assert_eq!(log.count(&SurfaceCall::Play), 0);

        emit(&mut player, SurfaceEvent::Ready);
        assert_eq!(log.count(&SurfaceCall::Play), 1);
        assert!(player.snapshot().is_playing);
    }

    #[test]
    fn test_first_playing_unmutes() {
        let (mut player, log) = controller();
        open(&mut player, "a");
        assert!(!log.is_muted());
        assert_eq!(log.count(&SurfaceCall::Unmute), 1);

        emit(&mut player, SurfaceEvent::Playing);
        assert_eq!(log.count(&SurfaceCall::Unmute), 1);
    }

    #[test]
    fn test_toggle_play_commands_surface() {
        let (mut player, log) = controller();
        open(&mut player, "a");

        player.toggle_play();
        assert!(!player.snapshot().is_playing);
        assert_eq!(log.count(&SurfaceCall::Pause), 1);

        // The surface confirming the pause must not echo a second command.
        emit(&mut player, SurfaceEvent::Paused);
        assert_eq!(log.count(&SurfaceCall::Pause), 1);

        player.toggle_play();
        assert_eq!(log.count(&SurfaceCall::Play), 2);
    }

    #[test]
    fn test_external_pause_reconciles_store() {
        let (mut player, log) = controller();
        open(&mut player, "a");
        emit(&mut player, SurfaceEvent::Paused);

        assert!(!player.snapshot().is_playing);
        assert_eq!(log.count(&SurfaceCall::Pause), 0);
    }

    #[test]
    fn test_minimize_keeps_surface_by_default() {
        let (mut player, log) = controller();
        open(&mut player, "a");

        let decision = player.release_drag(drag(1, DragRegion::FullSurface, 45.0, 0.4));
        assert_eq!(decision, GestureDecision::Minimize);
        assert_eq!(player.snapshot().presentation_mode, PresentationMode::Mini);
        assert_eq!(log.created(), 1);
        assert_eq!(log.live_count(), 1);

        player.release_drag(drag(2, DragRegion::MiniPlayer, -50.0, 0.0));
        assert_eq!(player.snapshot().presentation_mode, PresentationMode::Full);
        assert_eq!(log.created(), 1);
    }

    #[test]
    fn test_recreate_on_mode_change_resumes_position() {
        let config = PlayerConfig {
            recreate_surface_on_mode_change: true,
            ..Default::default()
        };
        let (mut player, log) = controller_with(config);
        open(&mut player, "a");
        log.set_time(42.0);

        player.minimize();
        assert_eq!(player.snapshot().resume_position, 42.0);
        assert_eq!(log.created(), 2);
        assert_eq!(log.live_count(), 1);

        emit(&mut player, SurfaceEvent::Ready);
        assert!(log.calls().contains(&SurfaceCall::SeekTo(42.0)));
        assert_eq!(player.current_time(), 42.0);
    }

    #[test]
    fn test_close_releases_everything() {
        let (mut player, log) = controller();
        open(&mut player, "a");
        player.skip(10.0);

        player.release_drag(drag(1, DragRegion::FullSurface, 120.0, 0.0));
        player.release_drag(drag(2, DragRegion::MiniPlayer, 70.0, 0.0));

        assert_eq!(*player.snapshot(), PlaybackSnapshot::default());
        assert_eq!(log.live_count(), 0);
        assert!(player.scheduler().is_empty());

        // Duplicate close from an explicit button.
        player.close();
        assert_eq!(*player.snapshot(), PlaybackSnapshot::default());
    }

    #[test]
    fn test_events_after_close_are_ignored() {
        let (mut player, _log) = controller();
        open(&mut player, "a");
        player.close();

        emit(&mut player, SurfaceEvent::Playing);
        emit(&mut player, SurfaceEvent::Ended);
        assert_eq!(*player.snapshot(), PlaybackSnapshot::default());
        assert!(player.scheduler().is_empty());
    }

    #[test]
    fn test_selecting_other_video_retargets() {
        let (mut player, log) = controller();
        open(&mut player, "a");
        player.minimize();

        player.select_by_id("c").unwrap();
        assert_eq!(player.snapshot().presentation_mode, PresentationMode::Full);
        assert_eq!(log.created(), 1);
        assert!(log.calls().contains(&SurfaceCall::Load("c".into())));
        assert_eq!(log.count(&SurfaceCall::Play), 2);
    }

    #[test]
    fn test_selecting_before_ready_recreates_surface() {
        let (mut player, log) = controller();
        player.select_by_id("a").unwrap();
        player.select_by_id("b").unwrap();

        assert_eq!(log.created(), 2);
        assert_eq!(log.live_count(), 1);
        assert!(log.calls().contains(&SurfaceCall::Destroy("a".into())));
    }

    #[test]
    fn test_autoplay_countdown_advances() {
        let (mut player, log) = controller();
        open(&mut player, "a");
        emit(&mut player, SurfaceEvent::Ended);

        assert_eq!(player.countdown_remaining(), Some(2));
        assert_eq!(player.countdown_target().unwrap().id, "b");

        player.advance(Duration::from_secs(1));
        assert_eq!(player.countdown_remaining(), Some(1));

        player.advance(Duration::from_secs(1));
        assert_eq!(player.countdown_remaining(), None);
        assert_eq!(player.snapshot().active_video.as_ref().unwrap().id, "b");
        assert_eq!(player.snapshot().resume_position, 0.0);
        assert_eq!(player.scheduler().active_count(TaskKind::AutoplayCountdown), 0);
        assert!(log.calls().contains(&SurfaceCall::Load("b".into())));
    }

    #[test]
    fn test_cancel_autoplay_stays_on_ended_video() {
        let (mut player, log) = controller();
        open(&mut player, "a");
        emit(&mut player, SurfaceEvent::Ended);
        let plays = log.count(&SurfaceCall::Play);

        assert!(player.cancel_autoplay());
        assert!(!player.cancel_autoplay());
        player.advance(Duration::from_secs(5));

        assert_eq!(player.snapshot().active_video.as_ref().unwrap().id, "a");
        assert!(!player.snapshot().is_playing);
        assert_eq!(log.count(&SurfaceCall::Play), plays);
    }

    #[test]
    fn test_skip_now() {
        let (mut player, _log) = controller();
        open(&mut player, "c");
        emit(&mut player, SurfaceEvent::Ended);

        assert!(player.skip_now());
        assert_eq!(player.snapshot().active_video.as_ref().unwrap().id, "a");
        assert!(!player.skip_now());
        assert_eq!(player.scheduler().active_count(TaskKind::AutoplayCountdown), 0);
    }

    #[test]
    fn test_no_autoplay_in_mini_or_single_category() {
        let (mut player, _log) = controller();
        open(&mut player, "a");
        player.minimize();
        emit(&mut player, SurfaceEvent::Ended);
        assert_eq!(player.countdown_remaining(), None);

        open(&mut player, "s");
        emit(&mut player, SurfaceEvent::Ended);
        assert_eq!(player.countdown_remaining(), None);
    }

    #[test]
    fn test_leaving_full_tears_down_countdown() {
        let (mut player, _log) = controller();
        open(&mut player, "a");
        emit(&mut player, SurfaceEvent::Ended);
        player.minimize();

        assert_eq!(player.countdown_remaining(), None);
        assert_eq!(player.scheduler().active_count(TaskKind::AutoplayCountdown), 0);
        player.advance(Duration::from_secs(5));
        assert_eq!(player.snapshot().active_video.as_ref().unwrap().id, "a");
    }

    #[test]
    fn test_manual_selection_tears_down_countdown() {
        let (mut player, _log) = controller();
        open(&mut player, "a");
        emit(&mut player, SurfaceEvent::Ended);
        player.select_by_id("c").unwrap();

        assert_eq!(player.countdown_remaining(), None);
        player.advance(Duration::from_secs(5));
        assert_eq!(player.snapshot().active_video.as_ref().unwrap().id, "c");
    }

    #[test]
    fn test_repeated_ended_keeps_one_countdown() {
        let (mut player, _log) = controller();
        open(&mut player, "a");
        for _ in 0..10 {
            emit(&mut player, SurfaceEvent::Ended);
            player.advance(Duration::from_millis(300));
        }
        assert_eq!(player.scheduler().active_count(TaskKind::AutoplayCountdown), 1);
        assert_eq!(player.scheduler().stats().peak_countdowns, 1);
    }

    #[test]
    fn test_skip_and_feedback() {
        let (mut player, log) = controller();
        open(&mut player, "a");
        log.set_time(5.0);

        player.handle_key(ControlAction::SkipBackward);
        assert!(log.calls().contains(&SurfaceCall::SeekTo(0.0)));
        assert_eq!(player.skip_feedback(), Some("-10s"));

        player.handle_key(ControlAction::SkipForward);
        assert_eq!(player.current_time(), 10.0);
        assert_eq!(player.skip_feedback(), Some("+10s"));

        player.advance(Duration::from_millis(700));
        assert_eq!(player.skip_feedback(), None);
    }

    #[test]
    fn test_skip_before_ready_is_ignored() {
        let (mut player, log) = controller();
        player.select_by_id("a").unwrap();
        player.skip(10.0);
        player.seek(30.0);

        assert_eq!(player.skip_feedback(), None);
        assert!(!log.calls().iter().any(|c| matches!(c, SurfaceCall::SeekTo(_))));
    }

    #[test]
    fn test_controls_hide_after_idle() {
        let (mut player, _log) = controller();
        player.select_by_id("a").unwrap();
        emit(&mut player, SurfaceEvent::Ready);
        player.advance(Duration::from_secs(10));
        assert!(player.controls_visible());

        emit(&mut player, SurfaceEvent::Playing);
        player.advance(Duration::from_millis(3000));
        assert!(!player.controls_visible());

        player.user_activity();
        assert!(player.controls_visible());
    }

    #[test]
    fn test_position_poll_updates_time() {
        let (mut player, log) = controller();
        log.set_duration(180.0);
        open(&mut player, "a");
        log.set_time(12.0);

        player.advance(Duration::from_millis(400));
        assert_eq!(player.current_time(), 12.0);
        assert_eq!(player.duration(), 180.0);
    }

    #[test]
    fn test_reveal_related() {
        let (mut player, _log) = controller();
        open(&mut player, "b");

        let decision = player.release_drag(drag(1, DragRegion::FullSurface, -80.0, 0.0));
        assert_eq!(decision, GestureDecision::RevealRelated);
        assert!(player.show_related());
        assert_eq!(player.snapshot().presentation_mode, PresentationMode::Full);

        let related: Vec<_> = player.related_videos().into_iter().map(|v| v.id).collect();
        assert_eq!(related, vec!["a", "c"]);

        player.minimize();
        assert!(!player.show_related());
    }

    #[test]
    fn test_teardown_saves_position_and_cancels_timers() {
        let (mut player, log) = controller();
        open(&mut player, "a");
        emit(&mut player, SurfaceEvent::Ended);
        log.set_time(77.0);

        player.teardown();
        assert!(player.scheduler().is_empty());
        assert_eq!(log.live_count(), 0);
        assert_eq!(player.snapshot().resume_position, 77.0);
        assert_eq!(player.countdown_remaining(), None);
    }

    #[test]
    fn test_keys_ignored_in_mini() {
        let (mut player, _log) = controller();
        open(&mut player, "a");
        player.minimize();
        player.handle_key(ControlAction::PlayPause);
        assert!(player.snapshot().is_playing);
    }

    #[test]
    fn test_unknown_id() {
        let (mut player, _log) = controller();
        assert!(matches!(player.select_by_id("zz"), Err(Error::UnknownVideo(_))));
        assert_eq!(*player.snapshot(), PlaybackSnapshot::default());
    }

    #[test]
    fn test_late_event_for_previous_content_is_dropped() {
        let (mut player, log) = controller();
        open(&mut player, "a");
        let previous = log.generation();

        player.select_by_id("c").unwrap();
        assert_ne!(log.generation(), previous);

        // "a" reports its end only after the surface switched to "c".
        player.dispatch(previous, SurfaceEvent::Ended);
        assert!(player.snapshot().is_playing);
        assert_eq!(player.countdown_remaining(), None);
        assert_eq!(player.scheduler().active_count(TaskKind::AutoplayCountdown), 0);

        player.dispatch(log.generation(), SurfaceEvent::Ended);
        assert!(!player.snapshot().is_playing);
        assert_eq!(player.countdown_target().unwrap().id, "a");
    }

    #[test]
    fn test_ready_from_replaced_surface_is_dropped() {
        let (mut player, log) = controller();
        player.select_by_id("a").unwrap();
        let first = log.generation();
        player.select_by_id("b").unwrap();

        player.dispatch(first, SurfaceEvent::Ready);
        assert!(!player.surface_ready());
        assert_eq!(log.count(&SurfaceCall::Play), 0);

        player.dispatch(log.generation(), SurfaceEvent::Ready);
        assert!(player.surface_ready());
        assert_eq!(log.count(&SurfaceCall::Play), 1);
    }

    #[test]
    fn test_leaving_full_cancels_overlay_timers() {
        let (mut player, _log) = controller();
        open(&mut player, "a");
        player.skip(10.0);
        assert_eq!(player.scheduler().active_count(TaskKind::HideControls), 1);
        assert_eq!(player.scheduler().active_count(TaskKind::SkipFeedback), 1);

        player.minimize();
        assert_eq!(player.scheduler().active_count(TaskKind::HideControls), 0);
        assert_eq!(player.scheduler().active_count(TaskKind::SkipFeedback), 0);
        assert_eq!(player.skip_feedback(), None);

        // The mini player has no overlay to keep alive.
        player.user_activity();
        player.skip(10.0);
        assert_eq!(player.scheduler().active_count(TaskKind::HideControls), 0);
        assert_eq!(player.skip_feedback(), None);

        player.restore();
        assert!(player.controls_visible());
        player.advance(Duration::from_millis(3000));
        assert!(!player.controls_visible());
    }

    #[test]
    fn test_reselecting_ended_video_replays_from_start() {
        let (mut player, log) = controller();
        open(&mut player, "a");
        log.set_time(60.0);
        emit(&mut player, SurfaceEvent::Ended);
        let plays = log.count(&SurfaceCall::Play);

        player.select_by_id("a").unwrap();
        assert!(log.calls().contains(&SurfaceCall::SeekTo(0.0)));
        assert_eq!(player.current_time(), 0.0);
        assert_eq!(player.countdown_remaining(), None);
        assert_eq!(log.count(&SurfaceCall::Play), plays + 1);
        assert!(player.snapshot().is_playing);
    }

    #[test]
    fn test_reselecting_playing_video_keeps_play_head() {
        let (mut player, log) = controller();
        open(&mut player, "a");
        log.set_time(25.0);
        player.minimize();

        player.select_by_id("a").unwrap();
        assert_eq!(player.snapshot().presentation_mode, PresentationMode::Full);
        assert!(!log.calls().iter().any(|c| matches!(c, SurfaceCall::SeekTo(_))));
        assert_eq!(log.created(), 1);
    }
}
