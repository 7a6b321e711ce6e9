//! The mask editor: one surface, one tool state machine, one history.
//!
//! Every editor instance owns its layers and history outright, so several
//! editors (e.g. one per garment view) can run side by side without
//! sharing anything.

use image::{DynamicImage, GenericImageView, Rgb, RgbImage, RgbaImage};

use crate::config::EditorConfig;
use crate::error::{EditorError, LoadError};
use crate::history::History;
use crate::loader::{FileFetcher, ImageFetcher, LoadTicket, fetch_and_decode};
use crate::mask::{EncodedMask, encode_mask, render_mask};
use crate::raster::RasterBuffer;
use crate::surface::RasterSurface;
use crate::tools::{
    CanvasPoint, FillOutcome, PixelRect, PointerEvent, Tool, ToolAction, ToolPhase, ToolState,
    fill_and_denoise, fill_rect, stamp_dot, step, stroke_segment,
};
use crate::transform::ImageTransform;

#[derive(Debug)]
pub struct MaskEditor {
    config: EditorConfig,
    surface: RasterSurface,
    tools: ToolState,
    phase: ToolPhase,
    history: History,
    /// Generation of the most recently issued load ticket
    latest_load: u64,
    /// Bumped on every paint layer change
    revision: u64,
}

impl MaskEditor {
    /// Create an editor with an empty canvas. Fails if the configured
    /// canvas cannot be allocated.
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        let surface = RasterSurface::new(config.canvas_width, config.canvas_height)?;
        Ok(Self {
            tools: config.tool_state(),
            history: History::with_limit(config.history_limit),
            surface,
            config,
            phase: ToolPhase::Idle,
            latest_load: 0,
            revision: 0,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Start a load. Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_load += 1;
        LoadTicket(self.latest_load)
    }

    /// Deliver the result of a load started with [`Self::begin_load`].
    ///
    /// Returns `Ok(true)` when the image was installed and `Ok(false)` when
    /// a newer load has been started since. A failed load leaves the editor
    /// exactly as it was.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<DynamicImage, LoadError>,
    ) -> Result<bool, LoadError> {
        if ticket.0 != self.latest_load {
            log::debug!(
                "Dropping superseded load #{} (latest is #{})",
                ticket.0,
                self.latest_load
            );
            return Ok(false);
        }

        let image = result.inspect_err(|e| log::warn!("Image load failed: {}", e))?;
        self.install(&image);
        Ok(true)
    }

    /// Fetch, decode and install `url` from the filesystem
    pub fn load_image(&mut self, url: &str) -> Result<(), LoadError> {
        self.load_image_with(&FileFetcher, url)
    }

    /// Fetch, decode and install `url` through `fetcher`
    pub fn load_image_with<F>(&mut self, fetcher: &F, url: &str) -> Result<(), LoadError>
    where
        F: ImageFetcher + ?Sized,
    {
        let ticket = self.begin_load();
        let result = fetch_and_decode(fetcher, url);
        self.finish_load(ticket, result).map(|_| ())
    }

    /// Install an already decoded image, superseding any pending load.
    /// An image with no pixels is rejected and the editor is left as it was.
    pub fn set_image(&mut self, image: &DynamicImage) -> Result<(), LoadError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            log::warn!("Rejecting empty {}x{} image", width, height);
            return Err(LoadError::Empty { width, height });
        }

        self.begin_load();
        self.install(image);
        Ok(())
    }

    fn install(&mut self, image: &DynamicImage) {
        self.surface.install(image);
        self.phase = ToolPhase::Idle;
        self.history.clear();
        self.history.snapshot(self.surface.paint());
        self.revision += 1;

        if let (Some((w, h)), Some(t)) = (self.surface.original_size(), self.surface.transform()) {
            log::info!(
                "Loaded {}x{} image (scale {:.4}, offset {:.1},{:.1})",
                w,
                h,
                t.scale,
                t.offset_x,
                t.offset_y
            );
        }
    }

    /// An image has been installed and drawing is possible
    pub fn is_ready(&self) -> bool {
        self.surface.is_loaded()
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    /// Feed one pointer event. Ignored until an image is loaded.
    pub fn handle(&mut self, event: PointerEvent) {
        if !self.is_ready() {
            return;
        }

        let transition = step(self.phase, self.tools.active_tool, event);
        self.phase = transition.next;
        if let Some(action) = transition.action {
            self.apply(action);
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.handle(PointerEvent::Down(CanvasPoint::new(x, y)));
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.handle(PointerEvent::Move(CanvasPoint::new(x, y)));
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) {
        self.handle(PointerEvent::Up(CanvasPoint::new(x, y)));
    }

    pub fn pointer_leave(&mut self) {
        self.handle(PointerEvent::Leave);
    }

    fn apply(&mut self, action: ToolAction) {
        let size = self.tools.brush_size_px;
        let color = self.tools.brush_color;

        match action {
            ToolAction::Dot { at, mode } => {
                stamp_dot(self.surface.paint_mut(), at, size, color, mode);
                self.revision += 1;
            }
            ToolAction::Segment { from, to, mode } => {
                stroke_segment(self.surface.paint_mut(), from, to, size, color, mode);
                self.revision += 1;
            }
            ToolAction::CommitStroke => self.commit(),
            ToolAction::FillRect { anchor, release } => {
                let (w, h) = self.surface.canvas_size();
                let rect = PixelRect::spanning(anchor, release, w, h);
                fill_rect(self.surface.paint_mut(), rect, color);
                self.revision += 1;
                self.commit();
            }
            ToolAction::FloodFill { seed } => {
                let (x, y) = seed.pixel();
                match fill_and_denoise(self.surface.paint_mut(), x, y, color) {
                    FillOutcome::OutOfBounds => {
                        log::debug!("Ignoring fill outside the canvas at ({}, {})", x, y);
                    }
                    FillOutcome::Unchanged => self.commit(),
                    FillOutcome::Filled { pixels } => {
                        log::debug!("Filled {} pixels from ({}, {})", pixels, x, y);
                        self.revision += 1;
                        self.commit();
                    }
                }
            }
        }
    }

    fn commit(&mut self) {
        self.history.snapshot(self.surface.paint());
    }

    /// Close any gesture in progress: a stroke is committed, a rectangle
    /// selection is dropped.
    fn finish_gesture(&mut self) {
        match self.phase {
            ToolPhase::Stroking { .. } => self.commit(),
            ToolPhase::Selecting { .. } | ToolPhase::Idle => {}
        }
        self.phase = ToolPhase::Idle;
    }

    // ------------------------------------------------------------------
    // Tool settings
    // ------------------------------------------------------------------

    pub fn tool_state(&self) -> &ToolState {
        &self.tools
    }

    pub fn phase(&self) -> ToolPhase {
        self.phase
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if tool != self.tools.active_tool {
            self.finish_gesture();
            self.tools.active_tool = tool;
        }
    }

    pub fn set_brush_size(&mut self, size_px: u32) {
        self.tools.brush_size_px = size_px.max(1);
    }

    /// Change the mask color. Existing paint is recolored in place, alpha
    /// untouched, and the result is recorded as one history entry.
    pub fn set_brush_color(&mut self, color: Rgb<u8>) {
        if color == self.tools.brush_color {
            return;
        }
        self.tools.brush_color = color;

        if self.is_ready() && self.surface.paint().has_paint() {
            self.finish_gesture();
            let count = self.surface.paint_mut().recolor(color);
            log::debug!("Recolored {} painted pixels", count);
            self.revision += 1;
            self.commit();
        }
    }

    /// Rendering-only overlay opacity
    pub fn set_mask_opacity(&mut self, opacity: f32) {
        self.tools.mask_opacity = opacity.clamp(0.0, 1.0);
    }

    // ------------------------------------------------------------------
    // Editing commands
    // ------------------------------------------------------------------

    /// Erase all paint (recorded in history)
    pub fn clear(&mut self) {
        if !self.is_ready() {
            return;
        }
        self.phase = ToolPhase::Idle;
        self.surface.paint_mut().clear();
        self.revision += 1;
        self.commit();
    }

    pub fn undo(&mut self) -> bool {
        self.finish_gesture();
        match self.history.undo() {
            Some(state) => {
                self.surface.paint_mut().restore_from(state);
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.finish_gesture();
        match self.history.redo() {
            Some(state) => {
                self.surface.paint_mut().restore_from(state);
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn paint_layer(&self) -> &RasterBuffer {
        self.surface.paint()
    }

    pub fn base_layer(&self) -> &RasterBuffer {
        self.surface.base()
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        self.surface.canvas_size()
    }

    pub fn original_image_size(&self) -> Option<(u32, u32)> {
        self.surface.original_size()
    }

    pub fn transform(&self) -> Option<ImageTransform> {
        self.surface.transform()
    }

    /// Live rectangle while the rectangle tool is dragging
    pub fn selection_rect(&self) -> Option<PixelRect> {
        match self.phase {
            ToolPhase::Selecting { anchor, current } => {
                let (w, h) = self.surface.canvas_size();
                Some(PixelRect::spanning(anchor, current, w, h))
            }
            _ => None,
        }
    }

    /// Base image with the paint layer overlaid at the current mask opacity
    pub fn composite_preview(&self) -> RgbaImage {
        self.surface.composite(self.tools.mask_opacity)
    }

    /// Changes whenever the paint layer changes
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Black/white mask at original image resolution, `None` before an
    /// image has been loaded
    pub fn export_mask(&self) -> Option<RgbImage> {
        let (Some(original), Some(transform)) =
            (self.surface.original_size(), self.surface.transform())
        else {
            log::debug!("Export skipped: no image loaded");
            return None;
        };

        Some(render_mask(
            self.surface.paint(),
            &transform,
            original,
            self.config.alpha_threshold,
        ))
    }

    /// Export, encode and hand the mask to `on_save`.
    ///
    /// Without a loaded image this does nothing and `on_save` is never
    /// called. Returns whether the callback ran.
    pub fn save<F>(&self, on_save: F) -> bool
    where
        F: FnOnce(EncodedMask),
    {
        let Some(mask) = self.export_mask() else {
            return false;
        };

        match encode_mask(&mask) {
            Ok(encoded) => {
                log::info!(
                    "Saving {}x{} mask ({} bytes)",
                    encoded.width,
                    encoded.height,
                    encoded.bytes.len()
                );
                on_save(encoded);
                true
            }
            Err(e) => {
                log::warn!("Mask export failed: {}", e);
                false
            }
        }
    }
}
