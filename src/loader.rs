//! Image acquisition
//!
//! Fetching and decoding are kept apart from the editor so they can run on
//! a worker thread. The editor only sees the decoded result together with
//! the [`LoadTicket`] that was issued when the load started.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageReader};

use crate::error::LoadError;

/// Identifies one load request. Only the most recently issued ticket may
/// install its image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(pub(crate) u64);

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Source of raw image bytes for a URL
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError>;
}

/// Reads plain filesystem paths and `file://` URLs
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFetcher;

impl ImageFetcher for FileFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        let path = match url.split_once("://") {
            Some(("file", rest)) => rest,
            Some(_) => return Err(LoadError::UnsupportedScheme(url.to_string())),
            None => url,
        };

        fs::read(Path::new(path)).map_err(|source| LoadError::Fetch {
            url: url.to_string(),
            source,
        })
    }
}

/// Decode image bytes, guessing the format from the content
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, LoadError> {
    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| LoadError::Decode(image::ImageError::IoError(e)))?
        .decode()?;

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(LoadError::Empty { width, height });
    }

    Ok(img)
}

/// Fetch `url` through `fetcher` and decode it
pub fn fetch_and_decode<F>(fetcher: &F, url: &str) -> Result<DynamicImage, LoadError>
where
    F: ImageFetcher + ?Sized,
{
    let bytes = fetcher.fetch(url)?;
    log::debug!("Fetched {} bytes from '{}'", bytes.len(), url);
    decode_image(&bytes)
}
