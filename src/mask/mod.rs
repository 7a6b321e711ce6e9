//! Mask output
//!
//! Turns the paint layer into the strict two-tone image handed to the
//! caller, and normalizes or inspects mask files coming from elsewhere:
//! 1. `export` - reproject the paint layer to original resolution, encode
//! 2. `binarize` - threshold arbitrary mask images to a single channel

mod binarize;
mod export;

pub use binarize::{MaskReport, binarize_mask, inspect_mask};
pub use export::{
    DEFAULT_ALPHA_THRESHOLD, EncodedMask, MASK_BACKGROUND, MASK_FOREGROUND, encode_mask,
    render_mask,
};
