//! Error types shared across the mask painting engine.

use thiserror::Error;

/// Failure to acquire or decode a source image.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read image source '{url}': {source}")]
    Fetch {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported image source scheme in '{0}'")]
    UnsupportedScheme(String),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Errors surfaced by a [`crate::MaskEditor`].
#[derive(Debug, Error)]
pub enum EditorError {
    /// The requested canvas cannot be backed by a raster buffer.
    #[error("canvas {width}x{height} cannot back a raster surface")]
    UnsupportedCanvas { width: u32, height: u32 },
}

/// Errors raised while inspecting or encoding mask images.
#[derive(Debug, Error)]
pub enum MaskError {
    #[error("failed to encode mask: {0}")]
    Encode(#[source] image::ImageError),

    #[error("failed to decode mask: {0}")]
    Decode(#[source] image::ImageError),
}
