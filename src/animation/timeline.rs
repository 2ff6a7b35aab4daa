//! Progress-driven schedules for both title-card layouts.
//!
//! Everything here is a pure function of normalized progress in `[0, 1]`; wall-clock time never
//! enters. Both the realtime controller and the offline capture loop reach pixels through these
//! functions, which is what makes the two paths produce the same sequence.

/// Cross-dissolve half-window for the pieces layout, in progress units.
pub const PIECES_FADE: f64 = 0.05;
/// Maximum zoom gained by a piece over its visible window.
pub const PIECES_ZOOM: f64 = 0.10;

/// Progress by which every line part has started revealing.
pub const LINE_REVEAL_END: f64 = 0.75;
/// Fade-in length of a single line part, in progress units.
pub const LINE_FADE: f64 = 0.05;
/// Maximum zoom of the whole line at `progress = 1`.
pub const LINE_ZOOM: f64 = 0.05;

/// Progress at which dimmed parts start brightening.
pub const CRESCENDO_START: f64 = 0.6;
/// Opacity of non-highlighted parts before the crescendo.
pub const DIMMED_OPACITY: f64 = 0.4;
/// Crescendo level above which dimmed parts also glow.
pub const GLOW_CRESCENDO: f64 = 0.5;

/// Alpha and zoom of one piece at a given progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseSample {
    /// Opacity in `[0, 1]`; pieces at zero are not drawn.
    pub alpha: f64,
    /// Uniform scale factor in `[1, 1 + PIECES_ZOOM]`.
    pub scale: f64,
}

impl PhaseSample {
    const HIDDEN: Self = Self {
        alpha: 0.0,
        scale: 1.0,
    };

    /// Return `true` when the piece contributes pixels.
    pub fn is_visible(self) -> bool {
        self.alpha > 0.0
    }
}

/// `[start, end)` slice of progress owned by piece `index` out of `count`.
pub fn pieces_slice(index: usize, count: usize) -> (f64, f64) {
    let count = count.max(1) as f64;
    let slice = 1.0 / count;
    (index as f64 * slice, (index as f64 + 1.0) * slice)
}

/// Sequential-reveal schedule: piece `index` fades in around its slice start, holds at full
/// opacity, and fades out around its slice end while the next piece fades in.
pub fn pieces_phase(progress: f64, index: usize, count: usize) -> PhaseSample {
    if index >= count {
        return PhaseSample::HIDDEN;
    }
    let (start, end) = pieces_slice(index, count);
    let fade = PIECES_FADE;
    if progress < start - fade || progress > end + fade {
        return PhaseSample::HIDDEN;
    }

    let alpha = if progress < start + fade {
        (progress - (start - fade)) / (fade * 2.0)
    } else if progress > end - fade {
        1.0 - (progress - (end - fade)) / (fade * 2.0)
    } else {
        1.0
    };

    let phase_progress = (progress - start) / (end - start);
    PhaseSample {
        alpha: alpha.clamp(0.0, 1.0),
        scale: (1.0 + (phase_progress + 0.5) * PIECES_ZOOM).min(1.0 + PIECES_ZOOM),
    }
}

/// Progress at which line part `index` (of `count`) begins fading in.
pub fn line_part_start(index: usize, count: usize) -> f64 {
    let stagger = LINE_REVEAL_END / count.max(1) as f64;
    index as f64 * stagger
}

/// Cumulative-reveal alpha of line part `index`; once revealed a part stays revealed.
pub fn line_reveal(progress: f64, index: usize, count: usize) -> f64 {
    let start = line_part_start(index, count);
    if progress < start {
        return 0.0;
    }
    ((progress - start) / LINE_FADE).min(1.0)
}

/// Continuous zoom applied to the whole line.
pub fn line_zoom(progress: f64) -> f64 {
    1.0 + progress.clamp(0.0, 1.0) * LINE_ZOOM
}

/// Late-animation brightening level in `[0, 1]`.
pub fn crescendo(progress: f64) -> f64 {
    ((progress - CRESCENDO_START) / (1.0 - CRESCENDO_START)).clamp(0.0, 1.0)
}

/// Base opacity of a line part: highlighted parts are always full, others brighten from
/// [`DIMMED_OPACITY`] to 1 over the crescendo.
pub fn line_opacity(highlight: bool, progress: f64) -> f64 {
    if highlight {
        return 1.0;
    }
    DIMMED_OPACITY + (1.0 - DIMMED_OPACITY) * crescendo(progress)
}

/// Whether a line part carries a glow at `progress`.
pub fn line_glow(highlight: bool, progress: f64) -> bool {
    highlight || crescendo(progress) > GLOW_CRESCENDO
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
