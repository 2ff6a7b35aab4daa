use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{TitleCardError, TitleCardResult};
use crate::playback::cancel::CancelToken;
use crate::render::engine::RenderEngine;
use crate::settings::model::Settings;

/// Knobs for [`capture_frames`].
pub struct CaptureOpts<'a> {
    /// Checked before every frame.
    pub cancel: Option<CancelToken>,
    /// Call `on_yield` after this many frames (0 disables yielding).
    pub yield_every: usize,
    /// Receives the captured fraction in `(0, 1]` after each frame.
    pub on_progress: Option<Box<dyn FnMut(f64) + 'a>>,
    /// Cooperative yield hook; `None` means [`std::thread::yield_now`].
    pub on_yield: Option<Box<dyn FnMut() + 'a>>,
}

impl Default for CaptureOpts<'_> {
    fn default() -> Self {
        Self {
            cancel: None,
            yield_every: 8,
            on_progress: None,
            on_yield: None,
        }
    }
}

impl std::fmt::Debug for CaptureOpts<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureOpts")
            .field("cancel", &self.cancel)
            .field("yield_every", &self.yield_every)
            .field("on_progress", &self.on_progress.is_some())
            .field("on_yield", &self.on_yield.is_some())
            .finish()
    }
}

impl<'a> CaptureOpts<'a> {
    /// Attach a cancellation token.
    pub fn cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Set the yield interval.
    pub fn yield_every(mut self, frames: usize) -> Self {
        self.yield_every = frames;
        self
    }

    /// Install a progress callback.
    pub fn on_progress(mut self, f: impl FnMut(f64) + 'a) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    /// Install a yield hook.
    pub fn on_yield(mut self, f: impl FnMut() + 'a) -> Self {
        self.on_yield = Some(Box::new(f));
        self
    }
}

/// Summary of a finished capture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptureStats {
    /// Frames pushed to the sink (`total_frames + 1`).
    pub frames: u64,
    /// Last frame index of the timeline.
    pub total_frames: u64,
    /// Delay reported with every frame.
    pub frame_delay_ms: f64,
    /// Frames whose plan fingerprint matched the previous frame's.
    pub held_frames: u64,
}

/// Render every frame `0..=total_frames` in order and push it to `sink`.
///
/// No wall-clock pacing: each frame reports a delay of `1000 / fps` ms. On cancellation or a
/// render/sink failure the sink is aborted and `end` is never called.
pub fn capture_frames(
    engine: &mut RenderEngine,
    settings: &Settings,
    sink: &mut dyn FrameSink,
    mut opts: CaptureOpts<'_>,
) -> TitleCardResult<CaptureStats> {
    settings.validate()?;
    let timing = settings.timing()?;
    let total = timing.total_frames();
    let frame_count = total.saturating_add(1);
    let delay_ms = timing.fps.frame_delay_ms();
    let canvas = engine.canvas();

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps: timing.fps,
        frame_count,
        frame_delay_ms: delay_ms,
    })?;
    tracing::debug!(total, delay_ms, "capture started");

    let mut previous = None;
    let mut held_frames = 0u64;
    for f in 0..=total {
        if opts.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            sink.abort();
            tracing::debug!(frame = f, "capture cancelled");
            return Err(TitleCardError::cancelled(format!(
                "capture cancelled at frame {f} of {total}"
            )));
        }

        let idx = FrameIndex(f);
        let pushed = engine
            .render_fingerprinted(settings, idx)
            .and_then(|(frame, fingerprint)| {
                sink.push_frame(idx, &frame, delay_ms)?;
                Ok(fingerprint)
            });
        let fingerprint = match pushed {
            Ok(fp) => fp,
            Err(e) => {
                sink.abort();
                return Err(e);
            }
        };
        if previous == Some(fingerprint) {
            held_frames += 1;
        }
        previous = Some(fingerprint);
        tracing::trace!(frame = f, %fingerprint, "captured frame");

        if let Some(cb) = opts.on_progress.as_mut() {
            cb((f + 1) as f64 / frame_count as f64);
        }
        let done = f.saturating_add(1) as usize;
        if opts.yield_every > 0 && done.is_multiple_of(opts.yield_every) {
            match opts.on_yield.as_mut() {
                Some(hook) => hook(),
                None => std::thread::yield_now(),
            }
        }
    }

    sink.end()?;
    tracing::debug!(frames = frame_count, held_frames, "capture finished");
    Ok(CaptureStats {
        frames: frame_count,
        total_frames: total,
        frame_delay_ms: delay_ms,
        held_frames,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/playback/capture.rs"]
mod tests;
