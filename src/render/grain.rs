//! Random sources for the film-grain effect.
//!
//! Grain is the only effect that is not a pure function of settings and frame. By default it
//! draws fresh entropy for every frame ([`EntropyGrain`]), so two renders of the same frame
//! differ. Install a [`SeededGrain`] to make grain reproducible, e.g. for exports and tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::foundation::core::FrameIndex;
use crate::foundation::math::mix64;

/// Largest per-pixel grain offset (exclusive on the positive side).
pub const GRAIN_AMPLITUDE: f32 = 20.0;

/// Provides the seed a frame's grain pattern is generated from.
pub trait GrainSource {
    /// Seed for `frame`. Deterministic sources return the same value for the same frame.
    fn frame_seed(&mut self, frame: FrameIndex) -> u64;
}

/// Non-deterministic grain: every call draws a fresh seed from the thread RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntropyGrain;

impl GrainSource for EntropyGrain {
    fn frame_seed(&mut self, _frame: FrameIndex) -> u64 {
        rand::random()
    }
}

/// Reproducible grain derived from a fixed seed and the frame index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeededGrain {
    /// Base seed.
    pub seed: u64,
}

impl SeededGrain {
    /// Grain source that always yields the same pattern for the same frame.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl GrainSource for SeededGrain {
    fn frame_seed(&mut self, frame: FrameIndex) -> u64 {
        mix64(self.seed ^ mix64(frame.0))
    }
}

/// Add one uniform offset in `[-GRAIN_AMPLITUDE, GRAIN_AMPLITUDE)` per pixel to R, G and B.
///
/// Alpha is left untouched and channels stay within `[0, alpha]` so the buffer remains valid
/// premultiplied RGBA8.
pub(crate) fn apply_grain(buf: &mut [u8], seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for px in buf.chunks_exact_mut(4) {
        let delta = rng.gen_range(-GRAIN_AMPLITUDE..GRAIN_AMPLITUDE).round() as i16;
        let a = i16::from(px[3]);
        for c in &mut px[..3] {
            *c = (i16::from(*c) + delta).clamp(0, a) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/grain.rs"]
mod tests;
