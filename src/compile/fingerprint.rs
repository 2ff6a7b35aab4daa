use crate::compile::plan::{FramePlan, TextDraw};
use crate::foundation::math::Fnv1a64;
use crate::settings::color::Color;

/// Stable 64-bit digest of a [`FramePlan`].
///
/// Two plans with the same fingerprint paint the same pixels (grain aside), which makes the value
/// useful in logs and for spotting held frames during capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameFingerprint(pub u64);

impl std::fmt::Display for FrameFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Hash everything in `plan` that influences pixels.
///
/// The frame index itself is not hashed, so identical still frames share a fingerprint.
pub fn fingerprint_plan(plan: &FramePlan) -> FrameFingerprint {
    let mut h = StableHasher::new();
    h.write_u32(plan.canvas.width);
    h.write_u32(plan.canvas.height);
    h.write_bytes(&plan.background.to_array());
    h.write_bool(plan.vignette);
    h.write_bool(plan.scanlines);
    h.write_bool(plan.grain);
    h.write_u64(plan.text.len() as u64);
    for draw in &plan.text {
        write_draw(&mut h, draw);
    }
    FrameFingerprint(h.finish())
}

fn write_draw(h: &mut StableHasher, draw: &TextDraw) {
    h.write_bytes(draw.font.family.as_bytes());
    h.write_u8(0);
    h.write_u32(u32::from(draw.font.weight.0));
    h.write_f64(draw.font.size);
    write_color(h, draw.color);
    h.write_f64(draw.alpha);
    match draw.shadow {
        Some(s) => {
            h.write_u8(1);
            write_color(h, s.color);
            h.write_f64(s.blur);
        }
        None => h.write_u8(0),
    }
    h.write_u64(draw.glyphs.len() as u64);
    for g in &draw.glyphs {
        h.write_u32(u32::from(g.ch));
        h.write_f64(g.x);
        h.write_f64(g.baseline_y);
    }
}

fn write_color(h: &mut StableHasher, c: Color) {
    h.write_bytes(&c.to_rgba8());
}

struct StableHasher {
    inner: Fnv1a64,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Fnv1a64::new_default(),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.write_bytes(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.inner.write_u8(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.inner.write_u32(v);
    }

    fn write_u64(&mut self, v: u64) {
        self.inner.write_u64(v);
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn finish(self) -> u64 {
        self.inner.finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/fingerprint.rs"]
mod tests;
