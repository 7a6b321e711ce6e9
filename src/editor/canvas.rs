use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, TextureHandle, TextureOptions, Vec2};
use mask_painter::{CanvasPoint, MaskEditor, PointerEvent, Tool};

const BACKGROUND: Color32 = Color32::from_gray(40);
const SELECTION_FILL: Color32 = Color32::from_rgba_premultiplied(0, 60, 120, 60);
const SELECTION_STROKE: Color32 = Color32::from_rgb(0, 150, 255);

/// Texture cache for the composited canvas
#[derive(Default)]
pub struct CanvasView {
    texture: Option<TextureHandle>,
    /// (paint revision, opacity bits) the texture was built from
    shown: Option<(u64, u32)>,
}

impl CanvasView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a texture rebuild on the next frame
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    fn refresh(&mut self, ctx: &egui::Context, editor: &MaskEditor) {
        let key = (
            editor.revision(),
            editor.tool_state().mask_opacity.to_bits(),
        );
        if self.shown == Some(key) && self.texture.is_some() {
            return;
        }

        let preview = editor.composite_preview();
        let size = [preview.width() as usize, preview.height() as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, preview.as_raw());

        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("mask-canvas", image, TextureOptions::NEAREST))
            }
        }
        self.shown = Some(key);
    }
}

fn to_canvas(pos: Pos2, canvas_rect: Rect) -> CanvasPoint {
    CanvasPoint::new(
        (pos.x - canvas_rect.min.x) as f64,
        (pos.y - canvas_rect.min.y) as f64,
    )
}

pub fn render_canvas(ui: &mut egui::Ui, editor: &mut MaskEditor, view: &mut CanvasView) {
    let (w, h) = editor.canvas_size();
    let (response, painter) =
        ui.allocate_painter(Vec2::new(w as f32, h as f32), Sense::click_and_drag());
    let canvas_rect = response.rect;

    painter.rect_filled(canvas_rect, 0.0, BACKGROUND);

    if !editor.is_ready() {
        painter.text(
            canvas_rect.center(),
            Align2::CENTER_CENTER,
            "Open an image to start painting",
            FontId::proportional(16.0),
            Color32::GRAY,
        );
        return;
    }

    handle_pointer(ui, editor, canvas_rect);

    view.refresh(ui.ctx(), editor);
    if let Some(texture) = &view.texture {
        painter.image(
            texture.id(),
            canvas_rect,
            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
            Color32::WHITE,
        );
    }

    // Live rectangle selection, not yet part of the paint layer
    if let Some(sel) = editor.selection_rect() {
        let min = canvas_rect.min + Vec2::new(sel.x0 as f32, sel.y0 as f32);
        let max = canvas_rect.min + Vec2::new(sel.x1 as f32, sel.y1 as f32);
        let rect = Rect::from_min_max(min, max);
        painter.rect_filled(rect, 0.0, SELECTION_FILL);
        painter.rect_stroke(rect, 0.0, Stroke::new(1.0, SELECTION_STROKE));
    }

    // Brush outline
    let tool = editor.tool_state().active_tool;
    if matches!(tool, Tool::Brush | Tool::Eraser)
        && let Some(pos) = response.hover_pos()
    {
        let radius = editor.tool_state().brush_size_px as f32 / 2.0;
        painter.circle_stroke(pos, radius, Stroke::new(1.0, Color32::WHITE));
    }
}

/// Translate raw pointer state into editor events for this frame
fn handle_pointer(ui: &egui::Ui, editor: &mut MaskEditor, canvas_rect: Rect) {
    let (pressed, released, down, moved, latest) = ui.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.primary_down(),
            i.pointer.delta() != Vec2::ZERO,
            i.pointer.latest_pos(),
        )
    });
    let inside = latest.filter(|p| canvas_rect.contains(*p));

    if pressed && let Some(pos) = inside {
        editor.handle(PointerEvent::Down(to_canvas(pos, canvas_rect)));
    }

    if editor.phase().is_idle() {
        return;
    }

    match inside {
        // A press and release can land in the same frame
        Some(pos) if released || !down => {
            editor.handle(PointerEvent::Up(to_canvas(pos, canvas_rect)))
        }
        Some(pos) if moved && !pressed => {
            editor.handle(PointerEvent::Move(to_canvas(pos, canvas_rect)))
        }
        Some(_) => {}
        None => editor.handle(PointerEvent::Leave),
    }
}
