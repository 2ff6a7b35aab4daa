//! titlecard renders "X will return in ..." title cards, frame by frame.
//!
//! Every frame is a pure function of [`Settings`] and a [`FrameIndex`]; wall-clock time only
//! decides *which* frame to show. The public API has three layers:
//!
//! - [`RenderEngine`]: render any frame of the animation described by a [`Settings`] snapshot
//! - [`PlaybackController`]: realtime play / pause / seek / restart with live settings updates
//! - [`capture_frames`]: deterministic offline capture of every frame into a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod compile;
pub(crate) mod encode;
pub(crate) mod playback;
pub(crate) mod render;
pub(crate) mod settings;
pub(crate) mod text;

pub use crate::animation::timeline;
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Rgba8Premul, Timing};
pub use crate::foundation::error::{TitleCardError, TitleCardResult};

pub use crate::compile::fingerprint::{FrameFingerprint, fingerprint_plan};
pub use crate::compile::plan::{FramePlan, PlacedGlyph, Shadow, TextDraw, compile_frame};
pub use crate::encode::ffmpeg::{
    FfmpegSink, FfmpegSinkOpts, VideoFormat, flatten_premul_over_bg_to_opaque_rgba8,
    is_ffmpeg_on_path,
};
pub use crate::encode::png::{PngSequenceSink, write_png};
pub use crate::encode::sink::{
    CapturedFrame, FrameSink, InMemorySink, SinkConfig, export_file_name,
};
pub use crate::playback::cancel::CancelToken;
pub use crate::playback::capture::{CaptureOpts, CaptureStats, capture_frames};
pub use crate::playback::clock::{
    Clock, IntervalTicks, ManualClock, SystemClock, TickSource, VirtualTicks,
};
pub use crate::playback::controller::{PlaybackController, PlaybackState, RunOutcome, TickOutcome};
pub use crate::render::backend::{BackendKind, FrameRGBA, RenderBackend, create_backend};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::engine::RenderEngine;
pub use crate::render::grain::{EntropyGrain, GrainSource, SeededGrain};
pub use crate::settings::color::Color;
pub use crate::settings::model::{
    Effects, EffectsUpdate, FontWeight, Layout, MAX_TOTAL_FRAMES, Settings, SettingsUpdate,
    TitleSequence, TitleUnit,
};
pub use crate::settings::presets::{DEFAULT_PRESET, find_preset, preset, preset_names};
pub use crate::text::{BlockGlyphs, FontBook, FontSpec, GlyphSource, VMetrics};
