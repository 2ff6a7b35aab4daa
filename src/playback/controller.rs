use std::time::Duration;

use crate::encode::sink::FrameSink;
use crate::foundation::core::{FrameIndex, Timing};
use crate::foundation::error::{TitleCardError, TitleCardResult};
use crate::playback::cancel::CancelToken;
use crate::playback::capture::{CaptureOpts, CaptureStats, capture_frames};
use crate::playback::clock::{Clock, SystemClock, TickSource};
use crate::render::backend::FrameRGBA;
use crate::render::engine::RenderEngine;
use crate::settings::model::{Settings, SettingsUpdate};

/// Whether the controller is advancing with its clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Frame frozen; seeking allowed.
    #[default]
    Stopped,
    /// Frames follow the clock on every tick.
    Playing,
}

/// Result of a single [`PlaybackController::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing happened.
    Idle,
    /// The clock has not reached a new frame since the last render.
    Held(FrameIndex),
    /// A new frame was rendered.
    Rendered(FrameIndex),
    /// The final frame was rendered and playback stopped.
    Completed(FrameIndex),
}

/// Why [`PlaybackController::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Playback reached the final frame.
    Completed,
    /// The cancel token fired; playback is paused.
    Cancelled,
    /// The tick source ran dry; playback is still `Playing`.
    TicksExhausted,
}

type UpdateFn = Box<dyn FnMut(f64)>;
type CompleteFn = Box<dyn FnMut()>;

/// Interactive driver around a [`RenderEngine`]: play, pause, seek, restart, live settings.
///
/// Frame selection is anchored: `play` records `(current_frame, now)` and each tick renders
/// `anchor_frame + floor((now - anchor_time) * fps)`. Frames skipped by a slow tick are never
/// caught up.
pub struct PlaybackController<C: Clock = SystemClock> {
    engine: RenderEngine,
    settings: Settings,
    clock: C,
    state: PlaybackState,
    current_frame: FrameIndex,
    anchor: Option<(FrameIndex, Duration)>,
    last_frame: Option<FrameRGBA>,
    last_rendered: Option<FrameIndex>,
    on_update: Option<UpdateFn>,
    on_complete: Option<CompleteFn>,
}

impl<C: Clock> std::fmt::Debug for PlaybackController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state)
            .field("current_frame", &self.current_frame)
            .field("total_frames", &self.total_frames())
            .finish_non_exhaustive()
    }
}

impl PlaybackController<SystemClock> {
    /// Controller on the wall clock.
    pub fn new(engine: RenderEngine, settings: Settings) -> TitleCardResult<Self> {
        Self::with_clock(engine, settings, SystemClock::new())
    }
}

impl<C: Clock> PlaybackController<C> {
    /// Controller reading time from `clock`. Starts `Stopped` at frame 0 with nothing rendered.
    pub fn with_clock(engine: RenderEngine, settings: Settings, clock: C) -> TitleCardResult<Self> {
        settings.validate()?;
        Ok(Self {
            engine,
            settings,
            clock,
            state: PlaybackState::Stopped,
            current_frame: FrameIndex(0),
            anchor: None,
            last_frame: None,
            last_rendered: None,
            on_update: None,
            on_complete: None,
        })
    }

    /// Called with the progress of every rendered frame.
    pub fn set_on_update(&mut self, f: impl FnMut(f64) + 'static) {
        self.on_update = Some(Box::new(f));
    }

    /// Called once each time playback reaches the final frame.
    pub fn set_on_complete(&mut self, f: impl FnMut() + 'static) {
        self.on_complete = Some(Box::new(f));
    }

    /// Current state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Shorthand for `state() == Playing`.
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Last successfully rendered (or seeked-to) frame.
    pub fn current_frame(&self) -> FrameIndex {
        self.current_frame
    }

    /// Normalized progress of [`PlaybackController::current_frame`].
    pub fn progress(&self) -> f64 {
        self.timing()
            .map(|t| t.progress(self.current_frame))
            .unwrap_or(1.0)
    }

    /// Last addressable frame index.
    pub fn total_frames(&self) -> u64 {
        self.settings.total_frames()
    }

    /// Settings in effect.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Most recently rendered pixels.
    pub fn last_frame(&self) -> Option<&FrameRGBA> {
        self.last_frame.as_ref()
    }

    /// Mutable access to the engine (e.g. to install a grain source).
    pub fn engine_mut(&mut self) -> &mut RenderEngine {
        &mut self.engine
    }

    /// Start or resume from the current frame; from 0 when already at the end.
    pub fn play(&mut self) {
        if self.is_playing() {
            return;
        }
        if self.current_frame.0 >= self.total_frames() {
            self.current_frame = FrameIndex(0);
        }
        self.state = PlaybackState::Playing;
        self.anchor = Some((self.current_frame, self.clock.now()));
        tracing::debug!(frame = self.current_frame.0, "playback started");
    }

    /// Freeze on the current frame. Does not notify completion.
    pub fn pause(&mut self) {
        if self.is_playing() {
            tracing::debug!(frame = self.current_frame.0, "playback paused");
        }
        self.halt();
    }

    /// Jump back to frame 0 and render it; keeps playing from there when playing.
    pub fn restart(&mut self) -> TitleCardResult<()> {
        self.render_or_halt(FrameIndex(0))?;
        if self.is_playing() {
            self.anchor = Some((FrameIndex(0), self.clock.now()));
        }
        Ok(())
    }

    /// Render `frame` (clamped to `[0, total_frames]`) and make it current.
    ///
    /// Rejected with [`TitleCardError::Playback`] while playing; state is left untouched.
    pub fn seek(&mut self, frame: FrameIndex) -> TitleCardResult<()> {
        if self.is_playing() {
            return Err(TitleCardError::playback("cannot seek while playing"));
        }
        let frame = FrameIndex(frame.0.min(self.total_frames()));
        self.render_at(frame)
    }

    /// Merge `update` atomically. When stopped, the current frame is re-rendered right away.
    pub fn update_settings(&mut self, update: &SettingsUpdate) -> TitleCardResult<()> {
        self.settings.merge(update)?;
        self.last_rendered = None;
        let total = self.total_frames();
        if self.is_playing() {
            // fps or duration may have changed; keep the frame, restart the clock from it.
            self.current_frame = FrameIndex(self.current_frame.0.min(total));
            self.anchor = Some((self.current_frame, self.clock.now()));
            Ok(())
        } else {
            self.render_at(FrameIndex(self.current_frame.0.min(total)))
        }
    }

    /// Re-render the current frame, e.g. after the engine changed.
    pub fn refresh(&mut self) -> TitleCardResult<()> {
        self.render_or_halt(self.current_frame)
    }

    /// Advance to the frame the clock points at and render it.
    pub fn tick(&mut self) -> TitleCardResult<TickOutcome> {
        let Some((anchor_frame, anchor_time)) = self.anchor.filter(|_| self.is_playing()) else {
            return Ok(TickOutcome::Idle);
        };
        let timing = self.timing()?;
        let elapsed = self.clock.now().saturating_sub(anchor_time);
        let frame = anchor_frame
            .0
            .saturating_add(timing.fps.elapsed_to_frames_floor(elapsed));
        let total = timing.total_frames();

        if frame >= total {
            let last = FrameIndex(total);
            self.render_or_halt(last)?;
            self.halt();
            tracing::debug!(frame = total, "playback completed");
            if let Some(cb) = self.on_complete.as_mut() {
                cb();
            }
            return Ok(TickOutcome::Completed(last));
        }

        let frame = FrameIndex(frame);
        if self.last_rendered == Some(frame) {
            return Ok(TickOutcome::Held(frame));
        }
        self.render_or_halt(frame)?;
        Ok(TickOutcome::Rendered(frame))
    }

    /// Play and tick on every `ticks` refresh until completion, cancellation or the source ends.
    pub fn run(
        &mut self,
        ticks: &mut dyn TickSource,
        cancel: Option<&CancelToken>,
    ) -> TitleCardResult<RunOutcome> {
        self.play();
        loop {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                self.pause();
                return Ok(RunOutcome::Cancelled);
            }
            if ticks.next_tick().is_none() {
                return Ok(RunOutcome::TicksExhausted);
            }
            if let TickOutcome::Completed(_) = self.tick()? {
                return Ok(RunOutcome::Completed);
            }
        }
    }

    /// Stop interactive playback, reset to frame 0, then capture every frame into `sink`.
    ///
    /// Frame 0 is rendered again afterwards, also when the capture fails or is cancelled, so the
    /// preview always matches the reset position. A capture error takes precedence.
    pub fn export(
        &mut self,
        sink: &mut dyn FrameSink,
        opts: CaptureOpts<'_>,
    ) -> TitleCardResult<CaptureStats> {
        self.halt();
        self.current_frame = FrameIndex(0);
        self.last_rendered = None;
        let captured = capture_frames(&mut self.engine, &self.settings, sink, opts);
        let restored = self.render_at(FrameIndex(0));
        let stats = captured?;
        restored?;
        Ok(stats)
    }

    fn timing(&self) -> TitleCardResult<Timing> {
        self.settings.timing()
    }

    fn halt(&mut self) {
        self.state = PlaybackState::Stopped;
        self.anchor = None;
    }

    fn render_or_halt(&mut self, frame: FrameIndex) -> TitleCardResult<()> {
        let res = self.render_at(frame);
        if let Err(e) = &res {
            tracing::debug!(frame = frame.0, "render failed, playback stopped: {e}");
            self.halt();
        }
        res
    }

    fn render_at(&mut self, frame: FrameIndex) -> TitleCardResult<()> {
        let rgba = self.engine.render(&self.settings, frame)?;
        self.last_frame = Some(rgba);
        self.last_rendered = Some(frame);
        self.current_frame = frame;
        let progress = self.progress();
        if let Some(cb) = self.on_update.as_mut() {
            cb(progress);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/controller.rs"]
mod tests;
