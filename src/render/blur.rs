use crate::foundation::error::{TitleCardError, TitleCardResult};

/// Separable gaussian blur of a premultiplied RGBA8 buffer (edges clamp).
pub(crate) fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> TitleCardResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| TitleCardError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(TitleCardError::render(
            "blur_rgba8_premul expects src matching width*height*4",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

/// Radius and sigma for a shadow-blur extent: `sigma = blur / 2`, radius covers three sigmas.
pub(crate) fn shadow_kernel(blur: f64) -> (u32, f32) {
    let sigma = (blur / 2.0).max(0.0);
    let radius = (sigma * 3.0).ceil().min(f64::from(u16::MAX)) as u32;
    (radius, sigma as f32)
}

/// Pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PxRect {
    pub(crate) x0: u32,
    pub(crate) y0: u32,
    pub(crate) x1: u32,
    pub(crate) y1: u32,
}

impl PxRect {
    pub(crate) fn width(self) -> u32 {
        self.x1 - self.x0
    }

    pub(crate) fn height(self) -> u32 {
        self.y1 - self.y0
    }

    /// Grow by `pad` on every side, clamped to `width x height`.
    pub(crate) fn inflate(self, pad: u32, width: u32, height: u32) -> Self {
        Self {
            x0: self.x0.saturating_sub(pad),
            y0: self.y0.saturating_sub(pad),
            x1: self.x1.saturating_add(pad).min(width),
            y1: self.y1.saturating_add(pad).min(height),
        }
    }
}

/// Bounding box of pixels with non-zero alpha, or `None` for a fully transparent buffer.
pub(crate) fn alpha_bounds(buf: &[u8], width: u32, height: u32) -> Option<PxRect> {
    let w = width as usize;
    let mut rect: Option<PxRect> = None;
    for y in 0..height as usize {
        let row = &buf[y * w * 4..(y + 1) * w * 4];
        let mut first = None;
        let mut last = 0usize;
        for (x, px) in row.chunks_exact(4).enumerate() {
            if px[3] != 0 {
                first.get_or_insert(x);
                last = x;
            }
        }
        let Some(first) = first else {
            continue;
        };
        let (y, first, last) = (y as u32, first as u32, last as u32);
        rect = Some(match rect {
            None => PxRect {
                x0: first,
                y0: y,
                x1: last + 1,
                y1: y + 1,
            },
            Some(r) => PxRect {
                x0: r.x0.min(first),
                y0: r.y0,
                x1: r.x1.max(last + 1),
                y1: y + 1,
            },
        });
    }
    rect
}

/// Copy `rect` out of a `width`-wide RGBA8 buffer.
pub(crate) fn crop(buf: &[u8], width: u32, rect: PxRect) -> Vec<u8> {
    let w = width as usize;
    let row_bytes = rect.width() as usize * 4;
    let mut out = Vec::with_capacity(row_bytes * rect.height() as usize);
    for y in rect.y0..rect.y1 {
        let start = (y as usize * w + rect.x0 as usize) * 4;
        out.extend_from_slice(&buf[start..start + row_bytes]);
    }
    out
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> TitleCardResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(TitleCardError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(TitleCardError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
