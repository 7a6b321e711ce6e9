//! Drawing tools
//!
//! Pointer input is interpreted by a pure state machine: [`step`] takes the
//! current [`ToolPhase`], the active [`Tool`] and a [`PointerEvent`] and
//! returns the next phase plus at most one [`ToolAction`] for the editor to
//! apply to the paint layer. Nothing here touches pixels.
//!
//! Rasterization lives in the submodules:
//! 1. `stroke` - round-capped brush and eraser segments, rectangle fills
//! 2. `fill` - seeded flood fill followed by the 3x3 median denoise pass

mod fill;
mod stroke;

use image::Rgb;

pub use fill::{FillOutcome, fill_and_denoise, flood_fill, median_denoise};
pub use stroke::{PixelRect, StrokeMode, fill_rect, stamp_dot, stroke_segment};

/// A position in canvas pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Pixel containing this point
    pub fn pixel(&self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Tool {
    #[default]
    Brush,
    Eraser,
    Rectangle,
    Fill,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Brush, Tool::Eraser, Tool::Rectangle, Tool::Fill];

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Brush => "Brush",
            Tool::Eraser => "Eraser",
            Tool::Rectangle => "Rectangle",
            Tool::Fill => "Fill",
        }
    }

    pub fn from_name(name: &str) -> Option<Tool> {
        match name.to_ascii_lowercase().as_str() {
            "brush" => Some(Tool::Brush),
            "eraser" | "erase" => Some(Tool::Eraser),
            "rectangle" | "rect" => Some(Tool::Rectangle),
            "fill" => Some(Tool::Fill),
            _ => None,
        }
    }
}

/// User-facing tool settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolState {
    pub active_tool: Tool,
    pub brush_size_px: u32,
    pub brush_color: Rgb<u8>,
    /// Overlay alpha used when rendering the paint layer. Never written
    /// into the layer itself.
    pub mask_opacity: f32,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            active_tool: Tool::Brush,
            brush_size_px: 20,
            brush_color: Rgb([255, 0, 0]),
            mask_opacity: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(CanvasPoint),
    Move(CanvasPoint),
    Up(CanvasPoint),
    /// The pointer left the canvas
    Leave,
}

/// Where the tool is within a gesture
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ToolPhase {
    #[default]
    Idle,
    /// Brush or eraser held down; `last` is the end of the previous segment
    Stroking { last: CanvasPoint },
    /// Rectangle drag in progress
    Selecting {
        anchor: CanvasPoint,
        current: CanvasPoint,
    },
}

impl ToolPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, ToolPhase::Idle)
    }
}

/// Paint layer mutation requested by a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolAction {
    /// Single round dab where a stroke starts
    Dot { at: CanvasPoint, mode: StrokeMode },
    Segment {
        from: CanvasPoint,
        to: CanvasPoint,
        mode: StrokeMode,
    },
    /// The stroke is complete; capture history
    CommitStroke,
    FillRect {
        anchor: CanvasPoint,
        release: CanvasPoint,
    },
    FloodFill { seed: CanvasPoint },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub next: ToolPhase,
    pub action: Option<ToolAction>,
}

impl Transition {
    fn to(next: ToolPhase) -> Self {
        Self { next, action: None }
    }

    fn with(next: ToolPhase, action: ToolAction) -> Self {
        Self {
            next,
            action: Some(action),
        }
    }
}

fn stroke_mode(tool: Tool) -> StrokeMode {
    if tool == Tool::Eraser {
        StrokeMode::Erase
    } else {
        StrokeMode::Paint
    }
}

/// Advance the tool state machine by one pointer event
pub fn step(phase: ToolPhase, tool: Tool, event: PointerEvent) -> Transition {
    match (tool, phase, event) {
        // Brush / eraser
        (Tool::Brush | Tool::Eraser, ToolPhase::Idle, PointerEvent::Down(at)) => Transition::with(
            ToolPhase::Stroking { last: at },
            ToolAction::Dot {
                at,
                mode: stroke_mode(tool),
            },
        ),
        (Tool::Brush | Tool::Eraser, ToolPhase::Stroking { last }, PointerEvent::Move(to)) => {
            Transition::with(
                ToolPhase::Stroking { last: to },
                ToolAction::Segment {
                    from: last,
                    to,
                    mode: stroke_mode(tool),
                },
            )
        }
        (
            Tool::Brush | Tool::Eraser,
            ToolPhase::Stroking { .. },
            PointerEvent::Up(_) | PointerEvent::Leave,
        ) => Transition::with(ToolPhase::Idle, ToolAction::CommitStroke),

        // Rectangle
        (Tool::Rectangle, ToolPhase::Idle, PointerEvent::Down(at)) => {
            Transition::to(ToolPhase::Selecting {
                anchor: at,
                current: at,
            })
        }
        (Tool::Rectangle, ToolPhase::Selecting { anchor, .. }, PointerEvent::Move(current)) => {
            Transition::to(ToolPhase::Selecting { anchor, current })
        }
        (Tool::Rectangle, ToolPhase::Selecting { anchor, .. }, PointerEvent::Up(release)) => {
            Transition::with(ToolPhase::Idle, ToolAction::FillRect { anchor, release })
        }
        (Tool::Rectangle, ToolPhase::Selecting { anchor, current }, PointerEvent::Leave) => {
            Transition::with(
                ToolPhase::Idle,
                ToolAction::FillRect {
                    anchor,
                    release: current,
                },
            )
        }

        // Fill acts on press only
        (Tool::Fill, _, PointerEvent::Down(seed)) => {
            Transition::with(ToolPhase::Idle, ToolAction::FloodFill { seed })
        }

        // Anything else leaves the phase alone
        (_, phase, _) => Transition::to(phase),
    }
}
