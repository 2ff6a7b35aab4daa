use crate::compile::fingerprint::{FrameFingerprint, fingerprint_plan};
use crate::compile::plan::{FramePlan, compile_frame};
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::TitleCardResult;
use crate::render::backend::{BackendKind, FrameRGBA, RenderBackend, create_backend};
use crate::render::grain::{EntropyGrain, GrainSource};
use crate::settings::model::Settings;
use crate::text::{BlockGlyphs, GlyphSource};

/// Frame renderer: `render(settings, frame)` is a pure function of its inputs.
///
/// The engine owns no clock; frames can be rendered in any order and repeatedly. The one
/// exception is the grain effect, which pulls a seed from the installed [`GrainSource`]. The
/// default source ([`EntropyGrain`]) is **non-deterministic**; install a
/// [`crate::SeededGrain`] via [`RenderEngine::set_grain_source`] for reproducible output.
pub struct RenderEngine {
    canvas: Canvas,
    glyphs: Box<dyn GlyphSource>,
    backend: Box<dyn RenderBackend>,
    grain: Box<dyn GrainSource>,
}

impl std::fmt::Debug for RenderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderEngine")
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl RenderEngine {
    /// Create an engine drawing onto `canvas` with `glyphs` as the text source.
    ///
    /// Fails fast when the canvas cannot back a raster surface.
    pub fn new(canvas: Canvas, glyphs: impl GlyphSource + 'static) -> TitleCardResult<Self> {
        canvas.validate()?;
        Ok(Self {
            canvas,
            glyphs: Box::new(glyphs),
            backend: create_backend(BackendKind::Cpu),
            grain: Box::new(EntropyGrain),
        })
    }

    /// Engine using the built-in [`BlockGlyphs`] face.
    pub fn with_block_glyphs(canvas: Canvas) -> TitleCardResult<Self> {
        Self::new(canvas, BlockGlyphs::new())
    }

    /// Replace the grain random source.
    pub fn set_grain_source(&mut self, grain: impl GrainSource + 'static) {
        self.grain = Box::new(grain);
    }

    /// Builder-style [`RenderEngine::set_grain_source`].
    pub fn with_grain_source(mut self, grain: impl GrainSource + 'static) -> Self {
        self.set_grain_source(grain);
        self
    }

    /// Output size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Compile the plan for `frame` without rasterizing it.
    pub fn plan(&mut self, settings: &Settings, frame: FrameIndex) -> TitleCardResult<FramePlan> {
        compile_frame(settings, self.canvas, frame, self.glyphs.as_mut())
    }

    /// Render `frame` of the animation described by `settings`.
    #[tracing::instrument(skip(self, settings), fields(layout = ?settings.layout))]
    pub fn render(&mut self, settings: &Settings, frame: FrameIndex) -> TitleCardResult<FrameRGBA> {
        let plan = compile_frame(settings, self.canvas, frame, self.glyphs.as_mut())?;
        self.backend
            .render_plan(&plan, self.glyphs.as_mut(), self.grain.as_mut())
    }

    /// Like [`RenderEngine::render`], also returning the fingerprint of the compiled plan.
    pub fn render_fingerprinted(
        &mut self,
        settings: &Settings,
        frame: FrameIndex,
    ) -> TitleCardResult<(FrameRGBA, FrameFingerprint)> {
        let plan = compile_frame(settings, self.canvas, frame, self.glyphs.as_mut())?;
        let fingerprint = fingerprint_plan(&plan);
        let rgba = self
            .backend
            .render_plan(&plan, self.glyphs.as_mut(), self.grain.as_mut())?;
        Ok((rgba, fingerprint))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/engine.rs"]
mod tests;
