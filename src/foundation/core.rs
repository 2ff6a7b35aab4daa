use std::time::Duration;

use crate::foundation::error::{TitleCardError, TitleCardResult};

pub use kurbo::Point;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Absolute 0-based frame index in animation timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> TitleCardResult<Self> {
        if den == 0 {
            return Err(TitleCardError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(TitleCardError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Delay between consecutive frames in milliseconds (`1000 / fps`).
    pub fn frame_delay_ms(self) -> f64 {
        self.frame_duration_secs() * 1000.0
    }

    /// Number of whole frames that fit into `elapsed` (floor semantics).
    ///
    /// Computed in integer nanoseconds so that frame boundaries are exact.
    pub fn elapsed_to_frames_floor(self, elapsed: Duration) -> u64 {
        let nanos = elapsed.as_nanos();
        let frames = nanos * u128::from(self.num) / (u128::from(self.den) * NANOS_PER_SEC);
        frames.min(u128::from(u64::MAX)) as u64
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas. Both sides must be in `1..=u16::MAX` (raster limit).
    pub fn new(width: u32, height: u32) -> TitleCardResult<Self> {
        let c = Self { width, height };
        c.validate()?;
        Ok(c)
    }

    /// Check that the canvas can back a raster surface.
    pub fn validate(self) -> TitleCardResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TitleCardError::validation("canvas width/height must be > 0"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(TitleCardError::validation(
                "canvas width/height must fit in u16",
            ));
        }
        Ok(())
    }

    /// Center point of the canvas.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channels as a `[r, g, b, a]` array.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Duration/fps pair that maps frame indices onto normalized progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    /// Animation length in seconds.
    pub duration_secs: f64,
    /// Frame rate.
    pub fps: Fps,
}

impl Timing {
    /// Create a validated timing. `duration_secs` must be finite and > 0.
    pub fn new(duration_secs: f64, fps: Fps) -> TitleCardResult<Self> {
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(TitleCardError::validation(
                "duration must be finite and > 0 seconds",
            ));
        }
        Ok(Self { duration_secs, fps })
    }

    /// `round(duration * fps)`; the last addressable frame index.
    pub fn total_frames(self) -> u64 {
        let t = (self.duration_secs * self.fps.as_f64()).round();
        if t.is_finite() && t > 0.0 { t as u64 } else { 0 }
    }

    /// Normalized progress for `frame`, clamped to `[0, 1]`.
    ///
    /// A timeline without frames is treated as fully revealed.
    pub fn progress(self, frame: FrameIndex) -> f64 {
        let total = self.total_frames();
        if total == 0 {
            return 1.0;
        }
        (frame.0 as f64 / total as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
