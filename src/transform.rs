//! Mapping between original image pixels and on-screen canvas pixels.

/// Uniform scale + offset that fits an image inside the canvas.
///
/// A point `(x, y)` of the original image lands on the canvas at
/// `(offset_x + x * scale, offset_y + y * scale)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageTransform {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl ImageTransform {
    pub fn identity() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }

    /// Aspect-preserving fit of `image` into `canvas`, centered on both axes
    pub fn fit(image: (u32, u32), canvas: (u32, u32)) -> Self {
        let (iw, ih) = (image.0 as f64, image.1 as f64);
        let (cw, ch) = (canvas.0 as f64, canvas.1 as f64);
        let scale = (cw / iw).min(ch / ih);

        Self {
            offset_x: (cw - iw * scale) / 2.0,
            offset_y: (ch - ih * scale) / 2.0,
            scale,
        }
    }

    /// Original image space -> canvas space
    pub fn to_canvas(&self, x: f64, y: f64) -> (f64, f64) {
        (self.offset_x + x * self.scale, self.offset_y + y * self.scale)
    }

    /// Canvas space -> original image space
    pub fn to_image(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.offset_x) / self.scale,
            (y - self.offset_y) / self.scale,
        )
    }

    /// Canvas pixel sampled for destination pixel `(dx, dy)` of an export
    /// of an `image`-sized original (nearest neighbor).
    ///
    /// The forward-mapped location is rounded and then clamped to the last
    /// canvas pixel the image covers, so the far edge never rounds off the
    /// image's footprint.
    pub fn sample_canvas_pixel(&self, dx: u32, dy: u32, image: (u32, u32)) -> (i64, i64) {
        let (sx, sy) = self.to_canvas(dx as f64, dy as f64);
        let (end_x, end_y) = self.to_canvas(image.0 as f64, image.1 as f64);
        let last_x = (end_x.ceil() as i64 - 1).max(self.offset_x.floor() as i64);
        let last_y = (end_y.ceil() as i64 - 1).max(self.offset_y.floor() as i64);
        ((sx.round() as i64).min(last_x), (sy.round() as i64).min(last_y))
    }

    /// Size of the image once scaled onto the canvas, at least 1x1
    pub fn scaled_size(&self, image: (u32, u32)) -> (u32, u32) {
        let w = (image.0 as f64 * self.scale).round().max(1.0);
        let h = (image.1 as f64 * self.scale).round().max(1.0);
        (w as u32, h as u32)
    }
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self::identity()
    }
}
