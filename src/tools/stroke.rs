//! Brush, eraser and rectangle rasterization onto the paint layer.

use image::{Rgb, Rgba};

use super::CanvasPoint;
use crate::raster::{RasterBuffer, TRANSPARENT, source_over};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeMode {
    /// Composite the brush color over existing paint
    Paint,
    /// Remove paint: destination alpha is scaled down by coverage
    Erase,
}

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl PixelRect {
    /// Rectangle spanned by two corners, rounded to pixel edges and clamped
    /// to a `width` x `height` canvas
    pub fn spanning(a: CanvasPoint, b: CanvasPoint, width: u32, height: u32) -> Self {
        let clamp_x = |v: f64| (v.round() as i64).clamp(0, width as i64);
        let clamp_y = |v: f64| (v.round() as i64).clamp(0, height as i64);

        Self {
            x0: clamp_x(a.x.min(b.x)),
            y0: clamp_y(a.y.min(b.y)),
            x1: clamp_x(a.x.max(b.x)),
            y1: clamp_y(a.y.max(b.y)),
        }
    }

    pub fn width(&self) -> i64 {
        (self.x1 - self.x0).max(0)
    }

    pub fn height(&self) -> i64 {
        (self.y1 - self.y0).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Distance from `(px, py)` to the segment `a`-`b`
fn distance_to_segment(px: f64, py: f64, a: CanvasPoint, b: CanvasPoint) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((px - a.x) * dx + (py - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Rasterize one round-capped segment of width `size_px`.
///
/// Coverage falls off over one pixel at the edge, so consecutive segments
/// of a stroke join smoothly through their round caps.
pub fn stroke_segment(
    buffer: &mut RasterBuffer,
    from: CanvasPoint,
    to: CanvasPoint,
    size_px: u32,
    color: Rgb<u8>,
    mode: StrokeMode,
) {
    let radius = size_px.max(1) as f64 / 2.0;
    let reach = radius + 1.0;

    let min_x = ((from.x.min(to.x) - reach).floor() as i64).max(0);
    let min_y = ((from.y.min(to.y) - reach).floor() as i64).max(0);
    let max_x = ((from.x.max(to.x) + reach).ceil() as i64).min(buffer.width() as i64 - 1);
    let max_y = ((from.y.max(to.y) + reach).ceil() as i64).min(buffer.height() as i64 - 1);

    let Rgb([r, g, b]) = color;
    let source = Rgba([r, g, b, 255]);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let d = distance_to_segment(x as f64 + 0.5, y as f64 + 0.5, from, to);
            let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }

            let Some(dst) = buffer.get_pixel(x, y) else {
                continue;
            };

            let out = match mode {
                StrokeMode::Paint => source_over(dst, source, coverage as f32),
                StrokeMode::Erase => {
                    let alpha = (dst[3] as f64 * (1.0 - coverage)).round() as u8;
                    if alpha == 0 {
                        TRANSPARENT
                    } else {
                        Rgba([dst[0], dst[1], dst[2], alpha])
                    }
                }
            };
            buffer.set_pixel(x, y, out);
        }
    }
}

/// A zero-length segment: one round dab
pub fn stamp_dot(
    buffer: &mut RasterBuffer,
    at: CanvasPoint,
    size_px: u32,
    color: Rgb<u8>,
    mode: StrokeMode,
) {
    stroke_segment(buffer, at, at, size_px, color, mode);
}

/// Fill `rect` with `color` at full opacity
pub fn fill_rect(buffer: &mut RasterBuffer, rect: PixelRect, color: Rgb<u8>) {
    let Rgb([r, g, b]) = color;
    for y in rect.y0..rect.y1 {
        for x in rect.x0..rect.x1 {
            buffer.set_pixel(x, y, Rgba([r, g, b, 255]));
        }
    }
}
