//! Normalization and inspection of mask images.
//!
//! The generation backend accepts any mask image and reduces it to a
//! single-channel 0/255 image before use. The same rule is reproduced here
//! so masks can be checked locally before they are handed off.

use image::{DynamicImage, GenericImageView, GrayImage, Luma};

use crate::error::MaskError;

const BINARY_CUTOFF: f32 = 128.0;

/// Threshold an arbitrary image into a 0/255 grayscale mask.
///
/// Four-channel images are thresholded on alpha (> 128 -> 255). Anything
/// else is thresholded on the mean of its channels.
pub fn binarize_mask(img: &DynamicImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let on = |value: f32| {
        if value > BINARY_CUTOFF {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    };

    match img.color().channel_count() {
        4 => {
            let rgba = img.to_rgba8();
            GrayImage::from_fn(width, height, |x, y| on(rgba.get_pixel(x, y)[3] as f32))
        }
        2 => {
            let la = img.to_luma_alpha8();
            GrayImage::from_fn(width, height, |x, y| {
                let p = la.get_pixel(x, y);
                on((p[0] as f32 + p[1] as f32) / 2.0)
            })
        }
        1 => {
            let gray = img.to_luma8();
            GrayImage::from_fn(width, height, |x, y| on(gray.get_pixel(x, y)[0] as f32))
        }
        _ => {
            let rgb = img.to_rgb8();
            GrayImage::from_fn(width, height, |x, y| {
                let p = rgb.get_pixel(x, y);
                on((p[0] as f32 + p[1] as f32 + p[2] as f32) / 3.0)
            })
        }
    }
}

/// Summary of an encoded mask file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskReport {
    pub width: u32,
    pub height: u32,
    pub has_alpha: bool,
    /// Every pixel is pure black or pure white
    pub is_binary: bool,
    /// Number of black (masked) pixels
    pub masked_pixels: usize,
}

impl MaskReport {
    /// Alpha-free and two-tone
    pub fn is_valid(&self) -> bool {
        !self.has_alpha && self.is_binary
    }
}

/// Decode `bytes` and report whether it is a well-formed mask
pub fn inspect_mask(bytes: &[u8]) -> Result<MaskReport, MaskError> {
    let img = image::load_from_memory(bytes).map_err(MaskError::Decode)?;
    let (width, height) = img.dimensions();
    let rgba = img.to_rgba8();

    let mut is_binary = true;
    let mut masked_pixels = 0;
    for p in rgba.pixels() {
        match p.0 {
            [0, 0, 0, 255] => masked_pixels += 1,
            [255, 255, 255, 255] => {}
            _ => is_binary = false,
        }
    }

    Ok(MaskReport {
        width,
        height,
        has_alpha: img.color().has_alpha(),
        is_binary,
        masked_pixels,
    })
}
