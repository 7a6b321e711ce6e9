//! Editor configuration

use image::Rgb;

use crate::mask::DEFAULT_ALPHA_THRESHOLD;
use crate::tools::{Tool, ToolState};

/// Options for a [`crate::MaskEditor`]
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Canvas width in pixels (fixed for the editor's lifetime)
    pub canvas_width: u32,
    /// Canvas height in pixels
    pub canvas_height: u32,
    /// Initial brush diameter
    pub brush_size_px: u32,
    /// Initial mask color
    pub brush_color: Rgb<u8>,
    /// Initial overlay opacity, 0.0..=1.0
    pub mask_opacity: f32,
    /// Paint alpha above this value is exported as masked
    pub alpha_threshold: u8,
    /// Maximum number of history entries; `None` keeps everything
    pub history_limit: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 500,
            canvas_height: 600,
            brush_size_px: 20,
            brush_color: Rgb([255, 0, 0]),
            mask_opacity: 0.5,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            history_limit: None,
        }
    }
}

impl EditorConfig {
    pub fn with_canvas(width: u32, height: u32) -> Self {
        Self {
            canvas_width: width,
            canvas_height: height,
            ..Self::default()
        }
    }

    pub fn tool_state(&self) -> ToolState {
        ToolState {
            active_tool: Tool::Brush,
            brush_size_px: self.brush_size_px.max(1),
            brush_color: self.brush_color,
            mask_opacity: self.mask_opacity.clamp(0.0, 1.0),
        }
    }
}
