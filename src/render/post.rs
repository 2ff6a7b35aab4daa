use crate::foundation::core::Canvas;
use crate::foundation::math::premul_over_px;

/// Vignette radius relative to half the canvas width.
pub const VIGNETTE_RADIUS: f64 = 1.2;
/// Opacity of the vignette at (and beyond) its radius.
pub const VIGNETTE_MAX_ALPHA: f64 = 0.8;
/// Distance between scanline rows.
pub const SCANLINE_PERIOD: u32 = 4;
/// Opacity of each scanline row.
pub const SCANLINE_ALPHA: f64 = 0.03;

/// Per-pixel black alpha of the radial vignette for one canvas size.
#[derive(Clone, Debug)]
pub(crate) struct VignetteMask {
    canvas: Canvas,
    alpha: Vec<u8>,
}

impl VignetteMask {
    pub(crate) fn new(canvas: Canvas) -> Self {
        let c = canvas.center();
        let radius = (f64::from(canvas.width) / 2.0 * VIGNETTE_RADIUS).max(1.0);
        let mut alpha = Vec::with_capacity(canvas.width as usize * canvas.height as usize);
        for y in 0..canvas.height {
            for x in 0..canvas.width {
                let dx = f64::from(x) + 0.5 - c.x;
                let dy = f64::from(y) + 0.5 - c.y;
                let t = ((dx * dx + dy * dy).sqrt() / radius).min(1.0);
                alpha.push((t * VIGNETTE_MAX_ALPHA * 255.0).round() as u8);
            }
        }
        Self { canvas, alpha }
    }

    pub(crate) fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Composite black at the mask's alpha over `buf`.
    pub(crate) fn apply(&self, buf: &mut [u8]) {
        for (px, &a) in buf.chunks_exact_mut(4).zip(&self.alpha) {
            let out = premul_over_px([px[0], px[1], px[2], px[3]], [0, 0, 0, a]);
            px.copy_from_slice(&out);
        }
    }
}

/// Composite a translucent white row every [`SCANLINE_PERIOD`] pixels.
pub(crate) fn apply_scanlines(buf: &mut [u8], width: u32, height: u32) {
    let a = (SCANLINE_ALPHA * 255.0).round() as u8;
    let line = [a, a, a, a];
    let row_bytes = width as usize * 4;
    for y in (0..height).step_by(SCANLINE_PERIOD as usize) {
        let start = y as usize * row_bytes;
        for px in buf[start..start + row_bytes].chunks_exact_mut(4) {
            let out = premul_over_px([px[0], px[1], px[2], px[3]], line);
            px.copy_from_slice(&out);
        }
    }
}

/// Source-over of a premultiplied RGBA8 `src` at `offset` onto `dst`, scaling `src` by `opacity`.
pub(crate) fn composite_over(
    dst: &mut [u8],
    dst_width: u32,
    src: &[u8],
    src_width: u32,
    offset: (u32, u32),
    opacity: f32,
) {
    if src_width == 0 {
        return;
    }
    let k = (opacity.clamp(0.0, 1.0) * 255.0).round() as u16;
    if k == 0 {
        return;
    }
    let dst_row = dst_width as usize * 4;
    let src_row = src_width as usize * 4;
    for (sy, row) in src.chunks_exact(src_row).enumerate() {
        let dy = offset.1 as usize + sy;
        let base = dy * dst_row + offset.0 as usize * 4;
        if base + src_row > dst.len() {
            break;
        }
        for (sx, s) in row.chunks_exact(4).enumerate() {
            if s[3] == 0 {
                continue;
            }
            let s = if k == 255 {
                [s[0], s[1], s[2], s[3]]
            } else {
                [
                    crate::foundation::math::mul_div255_u8(u16::from(s[0]), k),
                    crate::foundation::math::mul_div255_u8(u16::from(s[1]), k),
                    crate::foundation::math::mul_div255_u8(u16::from(s[2]), k),
                    crate::foundation::math::mul_div255_u8(u16::from(s[3]), k),
                ]
            };
            let i = base + sx * 4;
            let out = premul_over_px([dst[i], dst[i + 1], dst[i + 2], dst[i + 3]], s);
            dst[i..i + 4].copy_from_slice(&out);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/post.rs"]
mod tests;
