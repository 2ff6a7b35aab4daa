use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::TitleCardResult;
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before a capture starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Number of frames that will be pushed (`total_frames + 1`, both endpoints included).
    pub frame_count: u64,
    /// Spacing between consecutive frames, `1000 / fps`.
    pub frame_delay_ms: f64,
}

/// Sink contract for consuming captured frames in timeline order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order. A
/// capture that stops early (cancellation or render failure) calls [`FrameSink::abort`] instead
/// of [`FrameSink::end`].
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> TitleCardResult<()>;
    /// Push one frame together with its display delay in milliseconds.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA, delay_ms: f64)
    -> TitleCardResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> TitleCardResult<()>;
    /// Called instead of `end` when the capture stops early. Partial output may be discarded.
    fn abort(&mut self) {}
}

/// One captured frame with its reported delay.
#[derive(Clone, Debug, PartialEq)]
pub struct CapturedFrame {
    /// Timeline index.
    pub index: FrameIndex,
    /// Pixels.
    pub frame: FrameRGBA,
    /// Delay reported with the frame.
    pub delay_ms: f64,
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<CapturedFrame>,
    finished: bool,
    aborted: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[CapturedFrame] {
        &self.frames
    }

    /// `end` was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// `abort` was called.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> TitleCardResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        self.aborted = false;
        Ok(())
    }

    fn push_frame(
        &mut self,
        idx: FrameIndex,
        frame: &FrameRGBA,
        delay_ms: f64,
    ) -> TitleCardResult<()> {
        self.frames.push(CapturedFrame {
            index: idx,
            frame: frame.clone(),
            delay_ms,
        });
        Ok(())
    }

    fn end(&mut self) -> TitleCardResult<()> {
        self.finished = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}

/// Export file name for a character: spaces become underscores, e.g. `VICTOR_VON_DOOM_returning.gif`.
pub fn export_file_name(character_name: &str, ext: &str) -> String {
    let name = character_name.trim();
    let name = if name.is_empty() {
        crate::settings::model::PLACEHOLDER_NAME
    } else {
        name
    };
    let stem: String = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect();
    format!("{stem}_returning.{}", ext.trim_start_matches('.'))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
