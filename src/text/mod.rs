//! Glyph metrics and rasterization behind a single seam.
//!
//! Layout code only ever asks a [`GlyphSource`] for per-character advances and vertical metrics,
//! and asks it to paint a character at a pen position. [`FontBook`] answers with real font data;
//! [`BlockGlyphs`] answers with a built-in box face that needs no font files.

use crate::foundation::core::Point;
use crate::foundation::error::TitleCardResult;
use crate::settings::model::FontWeight;

pub(crate) mod block;
pub(crate) mod fontbook;

pub use block::BlockGlyphs;
pub use fontbook::FontBook;

/// Font request for one run of text.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// CSS-style family stack, e.g. `"'Bebas Neue', sans-serif"`.
    pub family: String,
    /// Requested weight.
    pub weight: FontWeight,
    /// Size in pixels (em box).
    pub size: f64,
}

impl FontSpec {
    /// Build a font request.
    pub fn new(family: impl Into<String>, weight: FontWeight, size: f64) -> Self {
        Self {
            family: family.into(),
            weight,
            size,
        }
    }
}

/// Ascent and descent above/below the baseline, both positive, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VMetrics {
    /// Distance from baseline to the top of the line box.
    pub ascent: f64,
    /// Distance from baseline to the bottom of the line box.
    pub descent: f64,
}

impl VMetrics {
    /// Baseline offset that vertically centers the line box on `center_y`.
    pub fn centered_baseline(self, center_y: f64) -> f64 {
        center_y + (self.ascent - self.descent) / 2.0
    }
}

/// Source of per-character metrics and glyph paint.
pub trait GlyphSource {
    /// Horizontal advance of `ch` at `font.size`, in pixels.
    fn advance(&mut self, ch: char, font: &FontSpec) -> TitleCardResult<f64>;

    /// Vertical metrics of `font`.
    fn vmetrics(&mut self, font: &FontSpec) -> TitleCardResult<VMetrics>;

    /// Fill `ch` with the context's current paint, pen at `origin` (baseline-left).
    fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        ch: char,
        origin: Point,
        font: &FontSpec,
    ) -> TitleCardResult<()>;

    /// Width of `text` when every character is followed by `spacing` (except the last).
    fn measure(&mut self, text: &str, font: &FontSpec, spacing: f64) -> TitleCardResult<f64> {
        let mut width = 0.0;
        let mut n = 0usize;
        for ch in text.chars() {
            width += self.advance(ch, font)?;
            n += 1;
        }
        if n > 1 {
            width += spacing * (n - 1) as f64;
        }
        Ok(width)
    }
}

impl<G: GlyphSource + ?Sized> GlyphSource for Box<G> {
    fn advance(&mut self, ch: char, font: &FontSpec) -> TitleCardResult<f64> {
        (**self).advance(ch, font)
    }

    fn vmetrics(&mut self, font: &FontSpec) -> TitleCardResult<VMetrics> {
        (**self).vmetrics(font)
    }

    fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        ch: char,
        origin: Point,
        font: &FontSpec,
    ) -> TitleCardResult<()> {
        (**self).draw(ctx, ch, origin, font)
    }
}
