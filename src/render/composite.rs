use crate::foundation::{
    core::{BlendMode, Rect},
    error::{CaptionError, CaptionResult},
};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over of premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255 - u16::from(sa);
            std::array::from_fn(|i| src[i].saturating_add(mul_div255(u16::from(dst[i]), inv)))
        }
    }
}

/// Blend `src` onto `dst` under `mode`. Destination-over keeps what is already drawn on top.
pub fn blend(dst: PremulRgba8, src: PremulRgba8, mode: BlendMode) -> PremulRgba8 {
    match mode {
        BlendMode::Normal => over(dst, src),
        BlendMode::DestOver => over(src, dst),
    }
}

/// Pixel-aligned column/row window of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelWindow {
    /// First column.
    pub x0: u32,
    /// First row.
    pub y0: u32,
    /// One past the last column.
    pub x1: u32,
    /// One past the last row.
    pub y1: u32,
}

impl PixelWindow {
    /// Whole surface.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x0: 0,
            y0: 0,
            x1: width,
            y1: height,
        }
    }

    /// Pixels whose centers fall inside `rect`, clamped to the surface.
    pub fn from_rect(rect: Rect, width: u32, height: u32) -> Self {
        let snap = |v: f64, max: u32| -> u32 {
            if v.is_nan() {
                0
            } else {
                v.round().clamp(0.0, f64::from(max)) as u32
            }
        };
        let x0 = snap(rect.x0.min(rect.x1), width);
        let y0 = snap(rect.y0.min(rect.y1), height);
        Self {
            x0,
            y0,
            x1: snap(rect.x0.max(rect.x1), width).max(x0),
            y1: snap(rect.y0.max(rect.y1), height).max(y0),
        }
    }

    /// No pixel is covered.
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }
}

/// Composite `src` onto `dst` inside `window`. Both buffers are `width`-wide premultiplied RGBA8.
pub fn composite_in_place(
    dst: &mut [u8],
    src: &[u8],
    width: u32,
    window: PixelWindow,
    mode: BlendMode,
) -> CaptionResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CaptionError::backend(
            "composite expects equal-length rgba8 buffers",
        ));
    }
    let stride = width as usize * 4;
    if stride == 0 || window.is_empty() {
        return Ok(());
    }
    let rows = dst.len() / stride;
    for y in (window.y0 as usize)..(window.y1 as usize).min(rows) {
        let row = y * stride;
        let start = row + window.x0 as usize * 4;
        let end = row + (window.x1 as usize).min(width as usize) * 4;
        if start >= end {
            continue;
        }
        for (d, s) in dst[start..end]
            .chunks_exact_mut(4)
            .zip(src[start..end].chunks_exact(4))
        {
            let out = blend([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], mode);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    let t = u32::from(x) * u32::from(y) + 128;
    ((t + (t >> 8)) >> 8) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
