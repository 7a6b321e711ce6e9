//! # mask-painter
//!
//! A raster mask painting engine for marking regions of a photo, e.g. the
//! garment area for a virtual try-on request.
//!
//! ## Features
//!
//! - **Paint layer editing**: brush, eraser, rectangle and flood fill tools
//!   driven by pointer events, with linear undo/redo
//! - **Mask export**: reprojects the paint layer to the original image
//!   resolution as an alpha-free black/white PNG
//! - **Mask tools**: binarize and inspect mask images, replay edit scripts
//!
//! ## Example
//!
//! ```rust,ignore
//! use mask_painter::{EditorConfig, MaskEditor};
//!
//! let mut editor = MaskEditor::new(EditorConfig::with_canvas(500, 600))?;
//! editor.load_image("person.jpg")?;
//! editor.pointer_down(100.0, 120.0);
//! editor.pointer_move(180.0, 160.0);
//! editor.pointer_up(180.0, 160.0);
//! editor.save(|mask| std::fs::write("mask.png", mask.bytes).unwrap());
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod loader;
pub mod mask;
pub mod raster;
pub mod request;
pub mod script;
pub mod session;
pub mod surface;
pub mod tools;
pub mod transform;

// Re-export commonly used items
pub use config::EditorConfig;
pub use error::{EditorError, LoadError, MaskError};
pub use loader::{FileFetcher, ImageFetcher, LoadTicket, fetch_and_decode};
pub use mask::{EncodedMask, binarize_mask, inspect_mask};
pub use raster::RasterBuffer;
pub use session::MaskEditor;
pub use tools::{CanvasPoint, PointerEvent, Tool, ToolState};
pub use transform::ImageTransform;
