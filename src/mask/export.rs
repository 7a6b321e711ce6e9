//! Paint layer -> black/white mask at original image resolution.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};

use crate::error::MaskError;
use crate::raster::RasterBuffer;
use crate::transform::ImageTransform;

/// Paint alpha above this value marks a pixel as masked
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 20;

/// Unpainted pixels
pub const MASK_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
/// Painted pixels
pub const MASK_FOREGROUND: Rgb<u8> = Rgb([0, 0, 0]);

/// An encoded, alpha-free PNG mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedMask {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl EncodedMask {
    pub const FILE_NAME: &'static str = "mask.png";
    pub const MIME_TYPE: &'static str = "image/png";
}

/// Rasterize the paint layer at `original` resolution.
///
/// Every destination pixel samples the nearest canvas pixel through
/// `transform`; no interpolation is applied so the result stays two-tone.
pub fn render_mask(
    paint: &RasterBuffer,
    transform: &ImageTransform,
    original: (u32, u32),
    threshold: u8,
) -> RgbImage {
    let (width, height) = original;
    let mut mask = RgbImage::from_pixel(width, height, MASK_BACKGROUND);

    for (dx, dy, pixel) in mask.enumerate_pixels_mut() {
        let (sx, sy) = transform.sample_canvas_pixel(dx, dy, original);
        if let Some(src) = paint.get_pixel(sx, sy)
            && src[3] > threshold
        {
            *pixel = MASK_FOREGROUND;
        }
    }

    mask
}

/// Encode as an RGB PNG. The encoder is given no alpha plane at all and
/// PNG is lossless, so the file holds exactly the two mask colors.
pub fn encode_mask(mask: &RgbImage) -> Result<EncodedMask, MaskError> {
    let (width, height) = mask.dimensions();
    let mut bytes = Vec::new();

    PngEncoder::new(&mut bytes)
        .write_image(mask.as_raw(), width, height, ExtendedColorType::Rgb8)
        .map_err(MaskError::Encode)?;

    Ok(EncodedMask {
        bytes,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_threshold_is_exclusive() {
        let mut paint = RasterBuffer::new(2, 1);
        paint.set_pixel(0, 0, Rgba([255, 0, 0, DEFAULT_ALPHA_THRESHOLD]));
        paint.set_pixel(1, 0, Rgba([255, 0, 0, DEFAULT_ALPHA_THRESHOLD + 1]));

        let mask = render_mask(
            &paint,
            &ImageTransform::identity(),
            (2, 1),
            DEFAULT_ALPHA_THRESHOLD,
        );
        assert_eq!(mask.get_pixel(0, 0), &MASK_BACKGROUND);
        assert_eq!(mask.get_pixel(1, 0), &MASK_FOREGROUND);
    }

    #[test]
    fn test_samples_outside_canvas_stay_white() {
        let mut paint = RasterBuffer::new(2, 2);
        paint.fill(Rgba([255, 0, 0, 255]));
        let transform = ImageTransform {
            offset_x: 1.0,
            offset_y: 0.0,
            scale: 1.0,
        };

        let mask = render_mask(&paint, &transform, (2, 2), DEFAULT_ALPHA_THRESHOLD);
        assert_eq!(mask.get_pixel(0, 0), &MASK_FOREGROUND);
        assert_eq!(mask.get_pixel(1, 0), &MASK_BACKGROUND);
    }

    #[test]
    fn test_encoded_png_has_no_alpha() {
        let mask = RgbImage::from_pixel(3, 2, MASK_BACKGROUND);
        let encoded = encode_mask(&mask).unwrap();
        let decoded = image::load_from_memory(&encoded.bytes).unwrap();
        assert!(!decoded.color().has_alpha());
        assert_eq!((encoded.width, encoded.height), (3, 2));
    }
}
