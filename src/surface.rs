//! Raster surface: the base image layer, the paint layer and the transform
//! that registers them against the original image.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};

use crate::error::EditorError;
use crate::raster::{RasterBuffer, source_over};
use crate::transform::ImageTransform;

/// Two co-registered canvas-sized layers plus the loaded image geometry.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    canvas_width: u32,
    canvas_height: u32,
    base: RasterBuffer,
    paint: RasterBuffer,
    transform: Option<ImageTransform>,
    original_size: Option<(u32, u32)>,
}

impl RasterSurface {
    /// Allocate a surface for a fixed canvas size.
    ///
    /// Fails when the size cannot be represented as an RGBA buffer, since
    /// there is nothing to draw on in that case.
    pub fn new(canvas_width: u32, canvas_height: u32) -> Result<Self, EditorError> {
        let byte_len = (canvas_width as usize)
            .checked_mul(canvas_height as usize)
            .and_then(|n| n.checked_mul(4));

        match byte_len {
            Some(len) if len > 0 && len <= isize::MAX as usize => Ok(Self {
                canvas_width,
                canvas_height,
                base: RasterBuffer::new(canvas_width, canvas_height),
                paint: RasterBuffer::new(canvas_width, canvas_height),
                transform: None,
                original_size: None,
            }),
            _ => Err(EditorError::UnsupportedCanvas {
                width: canvas_width,
                height: canvas_height,
            }),
        }
    }

    /// Replace the base image. Resets the paint layer to fully transparent.
    pub fn install(&mut self, image: &DynamicImage) {
        let original = image.dimensions();
        let transform = ImageTransform::fit(original, self.canvas_size());
        let (scaled_w, scaled_h) = transform.scaled_size(original);
        let rgba = image.to_rgba8();
        let scaled = if (scaled_w, scaled_h) == original {
            rgba
        } else {
            imageops::resize(&rgba, scaled_w, scaled_h, FilterType::Triangle)
        };

        self.base.clear();
        self.base.blit(
            &RasterBuffer::from_image(scaled),
            transform.offset_x.round() as i64,
            transform.offset_y.round() as i64,
        );
        self.paint.clear();
        self.transform = Some(transform);
        self.original_size = Some(original);
    }

    pub fn is_loaded(&self) -> bool {
        self.original_size.is_some()
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    pub fn original_size(&self) -> Option<(u32, u32)> {
        self.original_size
    }

    pub fn transform(&self) -> Option<ImageTransform> {
        self.transform
    }

    pub fn base(&self) -> &RasterBuffer {
        &self.base
    }

    pub fn paint(&self) -> &RasterBuffer {
        &self.paint
    }

    pub fn paint_mut(&mut self) -> &mut RasterBuffer {
        &mut self.paint
    }

    /// Render the base layer with the paint layer on top, the paint alpha
    /// multiplied by `opacity`. Neither layer is modified.
    pub fn composite(&self, opacity: f32) -> RgbaImage {
        let mut out = self.base.as_image().clone();
        let opacity = opacity.clamp(0.0, 1.0);

        for (dst, src) in out.pixels_mut().zip(self.paint.as_image().pixels()) {
            if src[3] > 0 {
                *dst = source_over(*dst, *src, opacity);
            }
        }

        out
    }
}
