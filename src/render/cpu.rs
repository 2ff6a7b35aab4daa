use crate::compile::plan::{FramePlan, Shadow, TextDraw};
use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{TitleCardError, TitleCardResult};
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::blur::{alpha_bounds, blur_rgba8_premul, crop, shadow_kernel};
use crate::render::grain::{GrainSource, apply_grain};
use crate::render::post::{VignetteMask, apply_scanlines, composite_over};
use crate::settings::color::Color;
use crate::text::GlyphSource;

/// CPU raster backend: glyphs through `vello_cpu`, everything else on plain RGBA8 buffers.
///
/// The render context, the glyph scratch surface and the vignette mask are kept between frames
/// and rebuilt only when the canvas size changes.
#[derive(Default)]
pub struct CpuBackend {
    ctx: Option<vello_cpu::RenderContext>,
    scratch: Option<vello_cpu::Pixmap>,
    vignette: Option<VignetteMask>,
}

impl std::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("has_ctx", &self.ctx.is_some())
            .field("vignette", &self.vignette.as_ref().map(VignetteMask::canvas))
            .finish()
    }
}

impl CpuBackend {
    /// Backend with empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> TitleCardResult<R>,
    ) -> TitleCardResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx);
        self.ctx = Some(ctx);
        out
    }

    fn vignette_for(&mut self, canvas: Canvas) -> &VignetteMask {
        let stale = self
            .vignette
            .as_ref()
            .is_none_or(|mask| mask.canvas() != canvas);
        if stale {
            self.vignette = None;
        }
        self.vignette.get_or_insert_with(|| VignetteMask::new(canvas))
    }

    /// Paint every glyph of `draw` in `color` into the scratch pixmap (transparent elsewhere).
    fn rasterize_run(
        &mut self,
        canvas: Canvas,
        draw: &TextDraw,
        color: Color,
        glyphs: &mut dyn GlyphSource,
    ) -> TitleCardResult<()> {
        let (w, h) = surface_dims(canvas)?;
        let mut pixmap = match self.scratch.take() {
            Some(p) if p.width() == w && p.height() == h => p,
            _ => vello_cpu::Pixmap::new(w, h),
        };
        let [r, g, b, a] = color.to_rgba8();
        let res = self.with_ctx_mut(w, h, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            for glyph in &draw.glyphs {
                glyphs.draw(
                    ctx,
                    glyph.ch,
                    Point::new(glyph.x, glyph.baseline_y),
                    &draw.font,
                )?;
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        });
        self.scratch = Some(pixmap);
        res
    }

    fn scratch_bytes(&self) -> TitleCardResult<&[u8]> {
        self.scratch
            .as_ref()
            .map(|p| p.data_as_u8_slice())
            .ok_or_else(|| TitleCardError::render("scratch surface missing"))
    }

    fn draw_shadow(
        &mut self,
        dst: &mut [u8],
        canvas: Canvas,
        draw: &TextDraw,
        shadow: Shadow,
        glyphs: &mut dyn GlyphSource,
    ) -> TitleCardResult<()> {
        self.rasterize_run(canvas, draw, shadow.color, glyphs)?;
        let src = self.scratch_bytes()?;
        let Some(bounds) = alpha_bounds(src, canvas.width, canvas.height) else {
            return Ok(());
        };
        let (radius, sigma) = shadow_kernel(shadow.blur);
        let rect = bounds.inflate(radius, canvas.width, canvas.height);
        let region = crop(src, canvas.width, rect);
        let blurred = blur_rgba8_premul(&region, rect.width(), rect.height(), radius, sigma)?;
        composite_over(
            dst,
            canvas.width,
            &blurred,
            rect.width(),
            (rect.x0, rect.y0),
            draw.alpha as f32,
        );
        Ok(())
    }

    fn draw_fill(
        &mut self,
        dst: &mut [u8],
        canvas: Canvas,
        draw: &TextDraw,
        glyphs: &mut dyn GlyphSource,
    ) -> TitleCardResult<()> {
        self.rasterize_run(canvas, draw, draw.color, glyphs)?;
        let src = self.scratch_bytes()?;
        composite_over(dst, canvas.width, src, canvas.width, (0, 0), draw.alpha as f32);
        Ok(())
    }
}

impl RenderBackend for CpuBackend {
    fn render_plan(
        &mut self,
        plan: &FramePlan,
        glyphs: &mut dyn GlyphSource,
        grain: &mut dyn GrainSource,
    ) -> TitleCardResult<FrameRGBA> {
        let canvas = plan.canvas;
        surface_dims(canvas)?;

        let pixels = canvas.width as usize * canvas.height as usize;
        let mut data = plan.background.to_array().repeat(pixels);

        if plan.vignette {
            self.vignette_for(canvas).apply(&mut data);
        }
        for draw in &plan.text {
            if draw.alpha <= 0.0 || draw.glyphs.is_empty() {
                continue;
            }
            if let Some(shadow) = draw.shadow {
                self.draw_shadow(&mut data, canvas, draw, shadow, glyphs)?;
            }
            self.draw_fill(&mut data, canvas, draw, glyphs)?;
        }
        if plan.scanlines {
            apply_scanlines(&mut data, canvas.width, canvas.height);
        }
        if plan.grain {
            apply_grain(&mut data, grain.frame_seed(plan.frame));
        }

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: true,
        })
    }
}

fn surface_dims(canvas: Canvas) -> TitleCardResult<(u16, u16)> {
    canvas.validate()?;
    let w = u16::try_from(canvas.width)
        .map_err(|_| TitleCardError::render("canvas width must fit in u16"))?;
    let h = u16::try_from(canvas.height)
        .map_err(|_| TitleCardError::render("canvas height must fit in u16"))?;
    Ok((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
