use crate::foundation::core::Point;
use crate::foundation::error::{TitleCardError, TitleCardResult};
use crate::text::{FontSpec, GlyphSource, VMetrics};

const ASCENT: f64 = 0.8;
const DESCENT: f64 = 0.2;
const CAP_HEIGHT: f64 = 0.7;
const INK_WIDTH: f64 = 0.8;

/// Built-in face that paints every visible character as a solid box.
///
/// Advances come from a small proportional table so that measured layout still depends on the
/// text, and bold/black weights widen the box slightly. No font files are needed, which makes
/// this the face of choice for tests and for hosts without fonts installed.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockGlyphs;

impl BlockGlyphs {
    /// Create the box face.
    pub fn new() -> Self {
        Self
    }

    fn advance_em(ch: char) -> f64 {
        match ch {
            ' ' => 0.35,
            'I' | 'J' | 'L' | '1' | '!' | '.' | ',' | ':' | ';' | '\'' | '|' => 0.3,
            'M' | 'W' | 'Æ' | 'Œ' => 0.9,
            'O' | 'Q' | 'G' | 'C' | 'D' | 'H' | 'N' | 'U' => 0.7,
            '-' => 0.4,
            _ => 0.62,
        }
    }

    fn weight_factor(font: &FontSpec) -> f64 {
        1.0 + (f64::from(font.weight.0) - 400.0).max(0.0) / 5000.0
    }

    fn check(font: &FontSpec) -> TitleCardResult<()> {
        if !font.size.is_finite() || font.size <= 0.0 {
            return Err(TitleCardError::render("font size must be finite and > 0"));
        }
        Ok(())
    }
}

impl GlyphSource for BlockGlyphs {
    fn advance(&mut self, ch: char, font: &FontSpec) -> TitleCardResult<f64> {
        Self::check(font)?;
        Ok(Self::advance_em(ch) * Self::weight_factor(font) * font.size)
    }

    fn vmetrics(&mut self, font: &FontSpec) -> TitleCardResult<VMetrics> {
        Self::check(font)?;
        Ok(VMetrics {
            ascent: ASCENT * font.size,
            descent: DESCENT * font.size,
        })
    }

    fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        ch: char,
        origin: Point,
        font: &FontSpec,
    ) -> TitleCardResult<()> {
        if ch.is_whitespace() {
            return Ok(());
        }
        let advance = self.advance(ch, font)?;
        let w = advance * INK_WIDTH;
        let x0 = origin.x + (advance - w) / 2.0;
        let top = origin.y - CAP_HEIGHT * font.size;
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(x0, top, x0 + w, origin.y));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/block.rs"]
mod tests;
