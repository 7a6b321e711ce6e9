//! Seeded flood fill and the median pass that cleans up after it.
//!
//! The fill works on the paint layer itself, not on the base image: it
//! selects the 4-connected region whose pixels are exactly equal to the
//! seed pixel. The median pass then runs over the whole layer so no
//! half-transparent fringe survives into the exported mask.

use std::collections::VecDeque;

use image::{Rgb, Rgba};

use crate::raster::{RasterBuffer, TRANSPARENT};

/// Result of [`fill_and_denoise`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// Seed outside the buffer; nothing happened
    OutOfBounds,
    /// Seed region already had the fill color; buffer untouched
    Unchanged,
    /// Region filled and layer denoised
    Filled { pixels: usize },
}

/// Fill the region connected to `(seed_x, seed_y)` with `color` at full
/// alpha. Returns the number of pixels written.
pub fn flood_fill(buffer: &mut RasterBuffer, seed_x: i64, seed_y: i64, color: Rgb<u8>) -> usize {
    let Some(target) = buffer.get_pixel(seed_x, seed_y) else {
        return 0;
    };
    let Rgb([r, g, b]) = color;
    let replacement = Rgba([r, g, b, 255]);
    if target == replacement {
        return 0;
    }

    let width = buffer.width() as usize;
    let height = buffer.height() as usize;
    let mut visited = vec![false; width * height];
    let mut queue = VecDeque::new();
    let mut filled = 0;

    queue.push_back((seed_x, seed_y));
    visited[seed_y as usize * width + seed_x as usize] = true;

    while let Some((x, y)) = queue.pop_front() {
        if buffer.get_pixel(x, y) != Some(target) {
            continue;
        }
        buffer.set_pixel(x, y, replacement);
        filled += 1;

        for (dx, dy) in [(-1i64, 0i64), (1, 0), (0, -1), (0, 1)] {
            let (nx, ny) = (x + dx, y + dy);
            if buffer.contains(nx, ny) {
                let idx = ny as usize * width + nx as usize;
                if !visited[idx] {
                    visited[idx] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    filled
}

/// Median of nine values (5th smallest)
fn median9(mut v: [u8; 9]) -> u8 {
    v.sort_unstable();
    v[4]
}

/// 3x3 median over the alpha channel of every interior pixel.
///
/// Pixels whose neighborhood median is nonzero become `color` at alpha 255,
/// the rest become fully transparent. The outermost row and column on each
/// side keep their values. Medians are taken from the alpha as it was
/// before the pass.
pub fn median_denoise(buffer: &mut RasterBuffer, color: Rgb<u8>) {
    let width = buffer.width() as usize;
    let height = buffer.height() as usize;
    if width < 3 || height < 3 {
        return;
    }

    let alpha = buffer.alpha_channel();
    let Rgb([r, g, b]) = color;
    let painted = Rgba([r, g, b, 255]);

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut window = [0u8; 9];
            let mut i = 0;
            for sy in y - 1..=y + 1 {
                let row = sy * width;
                for sx in x - 1..=x + 1 {
                    window[i] = alpha[row + sx];
                    i += 1;
                }
            }

            let out = if median9(window) > 0 { painted } else { TRANSPARENT };
            buffer.set_pixel(x as i64, y as i64, out);
        }
    }
}

/// Flood fill at `(seed_x, seed_y)` followed by the median pass
pub fn fill_and_denoise(
    buffer: &mut RasterBuffer,
    seed_x: i64,
    seed_y: i64,
    color: Rgb<u8>,
) -> FillOutcome {
    if !buffer.contains(seed_x, seed_y) {
        return FillOutcome::OutOfBounds;
    }

    let pixels = flood_fill(buffer, seed_x, seed_y, color);
    if pixels == 0 {
        return FillOutcome::Unchanged;
    }

    median_denoise(buffer, color);
    FillOutcome::Filled { pixels }
}
