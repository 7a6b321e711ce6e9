//! Owned RGBA raster buffers
//!
//! Drawing code never touches a UI-owned drawing context. Every layer is a
//! plain [`RasterBuffer`] that can be read, written, copied and compared
//! without a window.

use image::{Rgb, Rgba, RgbaImage};

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A mutable RGBA pixel buffer with bounds-checked access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    image: RgbaImage,
}

impl RasterBuffer {
    /// Create a fully transparent buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Whether `(x, y)` addresses a pixel of this buffer
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64
    }

    /// Read a pixel, `None` when out of bounds
    pub fn get_pixel(&self, x: i64, y: i64) -> Option<Rgba<u8>> {
        if self.contains(x, y) {
            Some(*self.image.get_pixel(x as u32, y as u32))
        } else {
            None
        }
    }

    /// Write a pixel. Out-of-bounds writes are dropped.
    pub fn set_pixel(&mut self, x: i64, y: i64, pixel: Rgba<u8>) {
        if self.contains(x, y) {
            self.image.put_pixel(x as u32, y as u32, pixel);
        }
    }

    /// Copy `source` into this buffer with its top-left corner at `(x, y)`,
    /// clipping whatever falls outside.
    pub fn blit(&mut self, source: &RasterBuffer, x: i64, y: i64) {
        for (sx, sy, pixel) in source.image.enumerate_pixels() {
            self.set_pixel(x + sx as i64, y + sy as i64, *pixel);
        }
    }

    /// Reset every pixel to fully transparent
    pub fn clear(&mut self) {
        self.fill(TRANSPARENT);
    }

    pub fn fill(&mut self, pixel: Rgba<u8>) {
        for p in self.image.pixels_mut() {
            *p = pixel;
        }
    }

    /// Replace the color of every pixel with alpha > 0, keeping its alpha.
    /// Returns the number of recolored pixels.
    pub fn recolor(&mut self, color: Rgb<u8>) -> usize {
        let Rgb([r, g, b]) = color;
        let mut count = 0;
        for p in self.image.pixels_mut() {
            if p[3] > 0 {
                *p = Rgba([r, g, b, p[3]]);
                count += 1;
            }
        }
        count
    }

    /// True when at least one pixel has nonzero alpha
    pub fn has_paint(&self) -> bool {
        self.image.pixels().any(|p| p[3] > 0)
    }

    /// Row-major copy of the alpha channel
    pub fn alpha_channel(&self) -> Vec<u8> {
        self.image.pixels().map(|p| p[3]).collect()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Overwrite this buffer with the contents of `other` (same dimensions).
    pub fn restore_from(&mut self, other: &RasterBuffer) {
        self.image.clone_from(&other.image);
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Non-premultiplied source-over with the source alpha scaled by `coverage`
pub fn source_over(dst: Rgba<u8>, src: Rgba<u8>, coverage: f32) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return TRANSPARENT;
    }

    let channel = |s: u8, d: u8| {
        ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
