use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Point;
use crate::foundation::error::{TitleCardError, TitleCardResult};
use crate::settings::model::parse_family_stack;
use crate::text::{FontSpec, GlyphSource, VMetrics};

/// Size at which characters are shaped once and then scaled.
const REF_SIZE: f32 = 100.0;

struct Face {
    family: String,
    weight: f32,
    data: vello_cpu::peniko::FontData,
}

#[derive(Clone, Debug)]
struct ShapedChar {
    /// Glyph id plus position relative to the pen, at [`REF_SIZE`].
    glyphs: Vec<(u32, f32, f32)>,
    advance: f32,
}

/// Registry of font faces, shaped with `parley` and painted with `vello_cpu` glyph runs.
///
/// Only registered fonts are consulted. When a requested family stack names no registered
/// family, the first registered face of the closest weight is used instead and a warning is
/// logged once per stack.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    faces: Vec<Face>,
    shaped: HashMap<(usize, char), ShapedChar>,
    vmetrics: HashMap<usize, (f32, f32)>,
    warned: HashSet<String>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("families", &self.families())
            .finish_non_exhaustive()
    }
}

impl FontBook {
    /// Empty book that ignores system fonts.
    pub fn new() -> Self {
        let collection = parley::fontique::Collection::new(parley::fontique::CollectionOptions {
            shared: false,
            system_fonts: false,
        });
        Self {
            font_ctx: parley::FontContext {
                collection,
                source_cache: parley::fontique::SourceCache::default(),
            },
            layout_ctx: parley::LayoutContext::new(),
            faces: Vec::new(),
            shaped: HashMap::new(),
            vmetrics: HashMap::new(),
            warned: HashSet::new(),
        }
    }

    /// Read and register every face in a font file; returns the family names it added.
    pub fn register_font_file(&mut self, path: impl AsRef<Path>) -> TitleCardResult<Vec<String>> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        self.register_font_bytes(bytes)
    }

    /// Register every face in an in-memory font (TTF/OTF/TTC).
    pub fn register_font_bytes(&mut self, bytes: Vec<u8>) -> TitleCardResult<Vec<String>> {
        let blob = parley::fontique::Blob::from(bytes.clone());
        let families = self.font_ctx.collection.register_fonts(blob, None);
        if families.is_empty() {
            return Err(TitleCardError::validation(
                "no font families registered from font bytes",
            ));
        }

        let vello_blob = vello_cpu::peniko::Blob::from(bytes);
        let mut names = Vec::with_capacity(families.len());
        for (family_id, infos) in families {
            let family = self
                .font_ctx
                .collection
                .family_name(family_id)
                .ok_or_else(|| TitleCardError::validation("registered font family has no name"))?
                .to_string();
            for info in infos {
                self.faces.push(Face {
                    family: family.clone(),
                    weight: info.weight().value(),
                    data: vello_cpu::peniko::FontData::new(vello_blob.clone(), info.index()),
                });
            }
            tracing::debug!(family = %family, "registered font family");
            names.push(family);
        }
        Ok(names)
    }

    /// Distinct registered family names, in registration order.
    pub fn families(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for face in &self.faces {
            if !out.contains(&face.family) {
                out.push(face.family.clone());
            }
        }
        out
    }

    /// Return `true` when no face has been registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    fn resolve(&mut self, font: &FontSpec) -> TitleCardResult<usize> {
        if self.faces.is_empty() {
            return Err(TitleCardError::render("font book has no registered faces"));
        }
        let want = f32::from(font.weight.0);
        let closest = |faces: &[Face], family: Option<&str>| -> Option<usize> {
            faces
                .iter()
                .enumerate()
                .filter(|(_, f)| family.is_none_or(|name| f.family.eq_ignore_ascii_case(name)))
                .min_by(|(_, a), (_, b)| {
                    (a.weight - want)
                        .abs()
                        .total_cmp(&(b.weight - want).abs())
                })
                .map(|(i, _)| i)
        };

        for family in parse_family_stack(&font.family) {
            if let Some(i) = closest(&self.faces, Some(&family)) {
                return Ok(i);
            }
        }

        let first_family = self.faces[0].family.clone();
        if self.warned.insert(font.family.clone()) {
            tracing::warn!(
                requested = %font.family,
                fallback = %first_family,
                "font family not registered, using fallback face"
            );
        }
        closest(&self.faces, Some(&first_family))
            .ok_or_else(|| TitleCardError::render("fallback face lookup failed"))
    }

    fn layout_at_ref(&mut self, face: usize, text: &str) -> parley::Layout<()> {
        let family = self.faces[face].family.clone();
        let weight = self.faces[face].weight;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(REF_SIZE));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(weight),
        ));
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    fn shaped(&mut self, face: usize, ch: char) -> ShapedChar {
        if let Some(s) = self.shaped.get(&(face, ch)) {
            return s.clone();
        }
        let mut buf = [0u8; 4];
        let text: &str = ch.encode_utf8(&mut buf);
        let layout = self.layout_at_ref(face, text);

        let mut glyphs = Vec::new();
        for line in layout.lines() {
            let baseline = line.metrics().baseline;
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                for g in run.positioned_glyphs() {
                    glyphs.push((g.id, g.x, g.y - baseline));
                }
            }
        }
        let shaped = ShapedChar {
            glyphs,
            advance: layout.full_width(),
        };
        self.shaped.insert((face, ch), shaped.clone());
        shaped
    }

    fn ref_vmetrics(&mut self, face: usize) -> (f32, f32) {
        if let Some(m) = self.vmetrics.get(&face) {
            return *m;
        }
        let layout = self.layout_at_ref(face, "H");
        let m = layout
            .lines()
            .next()
            .map(|line| (line.metrics().ascent, line.metrics().descent))
            .unwrap_or((REF_SIZE * 0.8, REF_SIZE * 0.2));
        self.vmetrics.insert(face, m);
        m
    }
}

fn scale_of(font: &FontSpec) -> TitleCardResult<f64> {
    if !font.size.is_finite() || font.size <= 0.0 {
        return Err(TitleCardError::render("font size must be finite and > 0"));
    }
    Ok(font.size / f64::from(REF_SIZE))
}

impl GlyphSource for FontBook {
    fn advance(&mut self, ch: char, font: &FontSpec) -> TitleCardResult<f64> {
        let scale = scale_of(font)?;
        let face = self.resolve(font)?;
        Ok(f64::from(self.shaped(face, ch).advance) * scale)
    }

    fn vmetrics(&mut self, font: &FontSpec) -> TitleCardResult<VMetrics> {
        let scale = scale_of(font)?;
        let face = self.resolve(font)?;
        let (ascent, descent) = self.ref_vmetrics(face);
        Ok(VMetrics {
            ascent: f64::from(ascent) * scale,
            descent: f64::from(descent) * scale,
        })
    }

    fn draw(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        ch: char,
        origin: Point,
        font: &FontSpec,
    ) -> TitleCardResult<()> {
        let scale = scale_of(font)?;
        let face = self.resolve(font)?;
        let shaped = self.shaped(face, ch);
        if shaped.glyphs.is_empty() {
            return Ok(());
        }
        let glyphs = shaped.glyphs.iter().map(|&(id, x, y)| vello_cpu::Glyph {
            id,
            x: (origin.x + f64::from(x) * scale) as f32,
            y: (origin.y + f64::from(y) * scale) as f32,
        });
        ctx.glyph_run(&self.faces[face].data)
            .font_size(font.size as f32)
            .fill_glyphs(glyphs);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fontbook.rs"]
mod tests;
