use crate::animation::timeline;
use crate::foundation::core::{Canvas, FrameIndex, Rgba8Premul};
use crate::foundation::error::TitleCardResult;
use crate::settings::color::Color;
use crate::settings::model::{Layout, Settings};
use crate::text::{FontSpec, GlyphSource};

/// Blur (in px) of the glow behind fully opaque text.
pub const SHADOW_BLUR: f64 = 20.0;
/// Line layout size relative to [`Settings::font_size`].
pub const LINE_SIZE_FACTOR: f64 = 0.6;
/// Line layout letter spacing relative to [`Settings::letter_spacing`].
pub const LINE_SPACING_FACTOR: f64 = 0.7;

#[derive(Clone, Debug, PartialEq)]
/// Backend-agnostic description of one frame.
///
/// A plan is a pure function of settings, canvas, frame index and glyph metrics. Backends turn it
/// into pixels in a fixed order: background, vignette, text (glow then fill, in draw order),
/// scanlines, grain.
pub struct FramePlan {
    /// Output size.
    pub canvas: Canvas,
    /// Frame the plan was compiled for.
    pub frame: FrameIndex,
    /// Normalized progress of `frame`.
    pub progress: f64,
    /// Opaque-or-not background fill.
    pub background: Rgba8Premul,
    /// Composite the radial vignette.
    pub vignette: bool,
    /// Text runs in paint order.
    pub text: Vec<TextDraw>,
    /// Overlay scanlines.
    pub scanlines: bool,
    /// Perturb pixels with grain.
    pub grain: bool,
}

/// One run of glyphs sharing font, color, opacity and glow.
#[derive(Clone, Debug, PartialEq)]
pub struct TextDraw {
    /// Font used for every glyph of the run.
    pub font: FontSpec,
    /// Characters with their pen positions.
    pub glyphs: Vec<PlacedGlyph>,
    /// Fill color (straight alpha).
    pub color: Color,
    /// Run opacity in `(0, 1]`.
    pub alpha: f64,
    /// Glow drawn beneath the fill.
    pub shadow: Option<Shadow>,
}

/// A character and its baseline-left pen position in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    /// Character to draw.
    pub ch: char,
    /// Pen x.
    pub x: f64,
    /// Baseline y.
    pub baseline_y: f64,
}

/// Blurred, colored copy of a text run painted beneath it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    /// Glow color.
    pub color: Color,
    /// Blur extent in px (shadow-blur semantics, `sigma = blur / 2`).
    pub blur: f64,
}

/// Compile `settings` at `frame` into a [`FramePlan`].
///
/// Settings are expected to be validated; a timeline without frames renders fully revealed.
#[tracing::instrument(skip(settings, glyphs), fields(layout = ?settings.layout))]
pub fn compile_frame(
    settings: &Settings,
    canvas: Canvas,
    frame: FrameIndex,
    glyphs: &mut dyn GlyphSource,
) -> TitleCardResult<FramePlan> {
    let progress = settings
        .timing()
        .map(|t| t.progress(frame))
        .unwrap_or(1.0);

    let text = match settings.layout {
        Layout::Pieces => compile_pieces(settings, canvas, progress, glyphs)?,
        Layout::Line => compile_line(settings, canvas, progress, glyphs)?,
    };

    Ok(FramePlan {
        canvas,
        frame,
        progress,
        background: settings.bg_color.to_rgba8_premul(),
        vignette: settings.effects.vignette,
        text,
        scanlines: settings.effects.scanlines,
        grain: settings.effects.grain,
    })
}

fn compile_pieces(
    settings: &Settings,
    canvas: Canvas,
    progress: f64,
    glyphs: &mut dyn GlyphSource,
) -> TitleCardResult<Vec<TextDraw>> {
    let units = settings.sequence.units();
    let name = settings.display_name();
    let center = canvas.center();
    let mut out = Vec::new();

    for (i, unit) in units.iter().enumerate() {
        let phase = timeline::pieces_phase(progress, i, units.len());
        if !phase.is_visible() {
            continue;
        }

        let mult = unit.size_mult * phase.scale;
        let spacing = f64::from(settings.letter_spacing) * spacing_factor(mult);
        let font = FontSpec::new(
            settings.font_family.clone(),
            unit.weight.unwrap_or(settings.font_weight),
            f64::from(settings.font_size) * mult,
        );

        let text = unit.resolve(name);
        let width = glyphs.measure(&text, &font, spacing)?;
        let baseline_y = glyphs.vmetrics(&font)?.centered_baseline(center.y);
        let placed = place_run(
            &text,
            center.x - width / 2.0,
            baseline_y,
            spacing,
            &font,
            glyphs,
        )?
        .0;

        out.push(TextDraw {
            font,
            glyphs: placed,
            color: settings.text_color,
            alpha: phase.alpha,
            shadow: settings.effects.text_shadow.then(|| Shadow {
                color: settings.accent_color,
                blur: SHADOW_BLUR * phase.alpha,
            }),
        });
    }
    Ok(out)
}

fn compile_line(
    settings: &Settings,
    canvas: Canvas,
    progress: f64,
    glyphs: &mut dyn GlyphSource,
) -> TitleCardResult<Vec<TextDraw>> {
    let units = settings.sequence.units();
    let name = settings.display_name();
    let center = canvas.center();

    let font = FontSpec::new(
        settings.font_family.clone(),
        settings.font_weight,
        f64::from(settings.font_size) * LINE_SIZE_FACTOR * timeline::line_zoom(progress),
    );
    let spacing = f64::from(settings.letter_spacing) * LINE_SPACING_FACTOR;

    let parts: Vec<String> = units
        .iter()
        .enumerate()
        .map(|(i, u)| {
            let text = u.resolve(name);
            if i == 0 { text } else { format!(" {text}") }
        })
        .collect();

    let full: String = parts.concat();
    let total_width = glyphs.measure(&full, &font, spacing)?;
    let baseline_y = glyphs.vmetrics(&font)?.centered_baseline(center.y);
    let crescendo = timeline::crescendo(progress);

    let mut x = center.x - total_width / 2.0;
    let mut out = Vec::new();
    for (i, (unit, text)) in units.iter().zip(&parts).enumerate() {
        let reveal = timeline::line_reveal(progress, i, units.len());
        let (placed, width) = place_run(text, x, baseline_y, spacing, &font, glyphs)?;
        x += width + spacing;
        if reveal <= 0.0 {
            continue;
        }

        let glow = settings.effects.text_shadow && timeline::line_glow(unit.highlight, progress);
        out.push(TextDraw {
            font: font.clone(),
            glyphs: placed,
            color: settings.text_color,
            alpha: reveal * timeline::line_opacity(unit.highlight, progress),
            shadow: glow.then(|| Shadow {
                color: settings.accent_color,
                blur: SHADOW_BLUR * reveal,
            }),
        });
    }
    tracing::trace!(crescendo, runs = out.len(), "compiled line layout");
    Ok(out)
}

/// Letter-spacing multiplier for a piece drawn at `mult` times the base size.
fn spacing_factor(mult: f64) -> f64 {
    if mult > 1.0 {
        1.0 + (mult - 1.0) / 2.0
    } else {
        mult
    }
}

/// Walk `text` from `x0`, returning placed glyphs and the run width (no trailing spacing).
fn place_run(
    text: &str,
    x0: f64,
    baseline_y: f64,
    spacing: f64,
    font: &FontSpec,
    glyphs: &mut dyn GlyphSource,
) -> TitleCardResult<(Vec<PlacedGlyph>, f64)> {
    let mut placed = Vec::with_capacity(text.len());
    let mut x = x0;
    for (i, ch) in text.chars().enumerate() {
        if i > 0 {
            x += spacing;
        }
        placed.push(PlacedGlyph { ch, x, baseline_y });
        x += glyphs.advance(ch, font)?;
    }
    Ok((placed, x - x0))
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
