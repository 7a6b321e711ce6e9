//! Integration tests for the editor session: loading, tools and history.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, Rgba, RgbaImage};
use mask_painter::{
    EditorConfig, EditorError, ImageFetcher, LoadError, MaskEditor, RasterBuffer, Tool,
};

const GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);
const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

// Helper to build a solid image of the given size
fn solid_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, GRAY))
}

// Editor with a `img_w` x `img_h` image loaded on a `canvas_w` x `canvas_h` canvas
fn loaded_editor(img_w: u32, img_h: u32, canvas_w: u32, canvas_h: u32) -> MaskEditor {
    let mut editor = MaskEditor::new(EditorConfig::with_canvas(canvas_w, canvas_h)).unwrap();
    editor.set_image(&solid_image(img_w, img_h)).unwrap();
    editor
}

fn stroke(editor: &mut MaskEditor, points: &[(f64, f64)]) {
    let (x0, y0) = points[0];
    editor.pointer_down(x0, y0);
    for &(x, y) in &points[1..] {
        editor.pointer_move(x, y);
    }
    let (xn, yn) = points[points.len() - 1];
    editor.pointer_up(xn, yn);
}

fn rect(editor: &mut MaskEditor, x0: f64, y0: f64, x1: f64, y1: f64) {
    editor.set_tool(Tool::Rectangle);
    editor.pointer_down(x0, y0);
    editor.pointer_move(x1, y1);
    editor.pointer_up(x1, y1);
}

fn transparent(editor: &MaskEditor) -> bool {
    !editor.paint_layer().has_paint()
}

/// Fetcher serving one in-memory PNG for any URL
struct MemoryFetcher(Vec<u8>);

impl ImageFetcher for MemoryFetcher {
    fn fetch(&self, _url: &str) -> Result<Vec<u8>, LoadError> {
        Ok(self.0.clone())
    }
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    solid_image(width, height)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

// ============================================================================
// Construction and loading
// ============================================================================

#[test]
fn test_zero_sized_canvas_fails_at_construction() {
    let result = MaskEditor::new(EditorConfig::with_canvas(0, 600));
    assert!(matches!(
        result,
        Err(EditorError::UnsupportedCanvas { width: 0, height: 600 })
    ));
}

#[test]
fn test_load_initializes_state() {
    let editor = loaded_editor(1024, 768, 500, 600);

    assert!(editor.is_ready());
    assert_eq!(editor.original_image_size(), Some((1024, 768)));
    assert!(transparent(&editor));
    assert_eq!(editor.history().len(), 1);
    assert!(!editor.can_undo());
    assert!(!editor.can_redo());

    let t = editor.transform().unwrap();
    assert!((t.scale - 500.0 / 1024.0).abs() < 1e-12);
}

#[test]
fn test_load_through_fetcher() {
    let mut editor = MaskEditor::new(EditorConfig::default()).unwrap();
    editor
        .load_image_with(&MemoryFetcher(png_bytes(64, 32)), "memory://person.png")
        .unwrap();
    assert_eq!(editor.original_image_size(), Some((64, 32)));
}

#[test]
fn test_failed_load_leaves_editor_not_ready() {
    let mut editor = MaskEditor::new(EditorConfig::default()).unwrap();
    let err = editor.load_image("/no/such/image.png").unwrap_err();
    assert!(matches!(err, LoadError::Fetch { .. }));
    assert!(!editor.is_ready());

    let bad = MemoryFetcher(b"definitely not a png".to_vec());
    assert!(editor.load_image_with(&bad, "x").is_err());
    assert!(!editor.is_ready());
}

#[test]
fn test_empty_image_is_rejected() {
    let mut editor = MaskEditor::new(EditorConfig::default()).unwrap();
    let err = editor.set_image(&solid_image(0, 10)).unwrap_err();
    assert!(matches!(err, LoadError::Empty { width: 0, height: 10 }));
    assert!(!editor.is_ready());
    assert!(editor.original_image_size().is_none());
    assert!(!editor.save(|_| {}));

    // A loaded editor keeps its image and paint
    let mut editor = loaded_editor(40, 40, 100, 100);
    rect(&mut editor, 10.0, 10.0, 50.0, 50.0);
    let painted = editor.paint_layer().clone();
    assert!(editor.set_image(&solid_image(10, 0)).is_err());
    assert_eq!(editor.original_image_size(), Some((40, 40)));
    assert_eq!(editor.paint_layer(), &painted);
}

#[test]
fn test_newest_load_wins() {
    let mut editor = MaskEditor::new(EditorConfig::default()).unwrap();
    let first = editor.begin_load();
    let second = editor.begin_load();

    // The older load finishes first and is dropped
    assert!(!editor.finish_load(first, Ok(solid_image(10, 10))).unwrap());
    assert!(!editor.is_ready());

    assert!(editor.finish_load(second, Ok(solid_image(20, 10))).unwrap());
    assert_eq!(editor.original_image_size(), Some((20, 10)));

    // A stale result arriving late does not replace the current image
    assert!(!editor.finish_load(first, Ok(solid_image(10, 10))).unwrap());
    assert_eq!(editor.original_image_size(), Some((20, 10)));
}

#[test]
fn test_failed_newest_load_keeps_previous_image() {
    let mut editor = loaded_editor(40, 40, 100, 100);
    rect(&mut editor, 10.0, 10.0, 50.0, 50.0);
    let painted = editor.paint_layer().clone();

    let ticket = editor.begin_load();
    let result = editor.finish_load(ticket, Err(LoadError::Empty { width: 0, height: 0 }));
    assert!(result.is_err());
    assert_eq!(editor.original_image_size(), Some((40, 40)));
    assert_eq!(editor.paint_layer(), &painted);
}

#[test]
fn test_new_image_resets_painting() {
    let mut editor = loaded_editor(300, 300, 300, 300);
    stroke(&mut editor, &[(10.0, 10.0), (100.0, 100.0)]);
    rect(&mut editor, 0.0, 0.0, 50.0, 50.0);
    assert!(editor.can_undo());

    editor.set_image(&solid_image(150, 300)).unwrap();
    assert!(transparent(&editor));
    assert_eq!(editor.history().len(), 1);
    assert!(!editor.can_undo());
    assert_eq!(editor.original_image_size(), Some((150, 300)));
}

#[test]
fn test_events_before_load_are_ignored() {
    let mut editor = MaskEditor::new(EditorConfig::default()).unwrap();
    stroke(&mut editor, &[(10.0, 10.0), (100.0, 100.0)]);
    editor.clear();
    assert!(transparent(&editor));
    assert!(editor.history().is_empty());
}

// ============================================================================
// Brush, eraser and rectangle
// ============================================================================

#[test]
fn test_brush_stroke_then_undo() {
    let mut editor = loaded_editor(1024, 768, 500, 600);
    let initial = editor.paint_layer().clone();

    stroke(&mut editor, &[(100.0, 200.0), (200.0, 250.0), (300.0, 260.0)]);
    assert!(editor.paint_layer().has_paint());

    assert!(editor.undo());
    assert!(transparent(&editor));
    assert_eq!(editor.paint_layer(), &initial);
}

#[test]
fn test_pointer_leave_commits_stroke() {
    let mut editor = loaded_editor(100, 100, 100, 100);
    editor.pointer_down(10.0, 10.0);
    editor.pointer_move(40.0, 40.0);
    editor.pointer_leave();

    assert_eq!(editor.history().len(), 2);
    assert!(editor.phase().is_idle());

    // The stroke survives a round trip through undo/redo
    let painted = editor.paint_layer().clone();
    editor.undo();
    editor.redo();
    assert_eq!(editor.paint_layer(), &painted);
}

#[test]
fn test_eraser_removes_paint_only() {
    let mut editor = loaded_editor(100, 100, 100, 100);
    rect(&mut editor, 0.0, 0.0, 100.0, 100.0);
    let base_before = editor.base_layer().clone();

    editor.set_tool(Tool::Eraser);
    editor.set_brush_size(10);
    stroke(&mut editor, &[(50.0, 10.0), (50.0, 90.0)]);

    assert_eq!(editor.paint_layer().get_pixel(50, 50).unwrap()[3], 0);
    assert_eq!(editor.paint_layer().get_pixel(5, 50).unwrap()[3], 255);
    assert_eq!(editor.base_layer(), &base_before);
}

#[test]
fn test_rectangle_preview_is_not_painted() {
    let mut editor = loaded_editor(100, 100, 100, 100);
    editor.set_tool(Tool::Rectangle);
    editor.pointer_down(10.0, 10.0);
    editor.pointer_move(60.0, 40.0);

    let sel = editor.selection_rect().unwrap();
    assert_eq!((sel.x0, sel.y0, sel.x1, sel.y1), (10, 10, 60, 40));
    assert!(transparent(&editor));

    editor.pointer_up(60.0, 40.0);
    assert!(editor.selection_rect().is_none());
    let painted = editor
        .paint_layer()
        .as_image()
        .pixels()
        .filter(|p| **p == Rgba([255, 0, 0, 255]))
        .count();
    assert_eq!(painted, 50 * 30);
}

#[test]
fn test_zero_area_rectangle_commits_unchanged_entry() {
    let mut editor = loaded_editor(100, 100, 100, 100);
    editor.set_tool(Tool::Rectangle);
    editor.pointer_down(20.0, 20.0);
    editor.pointer_up(20.0, 20.0);

    assert_eq!(editor.history().len(), 2);
    assert!(transparent(&editor));
}

#[test]
fn test_tool_switch_mid_stroke_commits() {
    let mut editor = loaded_editor(100, 100, 100, 100);
    editor.pointer_down(10.0, 10.0);
    editor.pointer_move(30.0, 30.0);
    editor.set_tool(Tool::Fill);

    assert!(editor.phase().is_idle());
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn test_fill_outside_canvas_is_ignored() {
    let mut editor = loaded_editor(100, 100, 100, 100);
    editor.set_tool(Tool::Fill);
    editor.pointer_down(150.0, 20.0);
    editor.pointer_down(-0.5, 20.0);

    assert_eq!(editor.history().len(), 1);
    assert!(transparent(&editor));
}

// ============================================================================
// Recolor and opacity
// ============================================================================

#[test]
fn test_recolor_preserves_alpha() {
    let mut editor = loaded_editor(200, 200, 200, 200);
    editor.set_brush_size(9);
    stroke(&mut editor, &[(20.0, 20.0), (150.0, 90.0), (60.0, 170.0)]);

    let before = editor.paint_layer().clone();
    let partial = before
        .as_image()
        .pixels()
        .filter(|p| p[3] > 0 && p[3] < 255)
        .count();
    assert!(partial > 0, "stroke should have anti-aliased edges");

    let entries = editor.history().len();
    editor.set_brush_color(BLUE);
    assert_eq!(editor.history().len(), entries + 1);

    for (old, new) in before
        .as_image()
        .pixels()
        .zip(editor.paint_layer().as_image().pixels())
    {
        assert_eq!(old[3], new[3]);
        if new[3] > 0 {
            assert_eq!(&new.0[..3], &BLUE.0);
        }
    }
}

#[test]
fn test_color_change_without_paint_adds_no_entry() {
    let mut editor = loaded_editor(50, 50, 50, 50);
    editor.set_brush_color(BLUE);
    assert_eq!(editor.history().len(), 1);
    assert_eq!(editor.tool_state().brush_color, BLUE);
}

#[test]
fn test_opacity_is_render_only() {
    let mut editor = loaded_editor(100, 100, 100, 100);
    rect(&mut editor, 0.0, 0.0, 50.0, 50.0);
    let paint = editor.paint_layer().clone();
    let entries = editor.history().len();

    editor.set_mask_opacity(0.2);
    let faint = editor.composite_preview();
    editor.set_mask_opacity(1.0);
    let solid = editor.composite_preview();

    assert_eq!(editor.paint_layer(), &paint);
    assert_eq!(editor.history().len(), entries);
    assert_ne!(faint.get_pixel(10, 10), solid.get_pixel(10, 10));
    assert_eq!(solid.get_pixel(10, 10), &Rgba([255, 0, 0, 255]));
}

// ============================================================================
// History
// ============================================================================

// Run `n` distinct edits, returning the paint layer after each
fn run_edits(editor: &mut MaskEditor, n: usize) -> Vec<RasterBuffer> {
    let mut states = Vec::new();
    for i in 0..n {
        let offset = 10.0 + 30.0 * i as f64;
        match i % 3 {
            0 => {
                editor.set_tool(Tool::Brush);
                stroke(editor, &[(offset, 20.0), (offset + 15.0, 120.0)]);
            }
            1 => rect(editor, offset, 130.0, offset + 20.0, 180.0),
            _ => {
                editor.set_tool(Tool::Eraser);
                stroke(editor, &[(offset - 50.0, 60.0), (offset, 60.0)]);
            }
        }
        states.push(editor.paint_layer().clone());
    }
    states
}

#[test]
fn test_undo_redo_round_trip() {
    const N: usize = 6;
    let mut editor = loaded_editor(400, 300, 400, 300);
    let initial = editor.paint_layer().clone();
    let states = run_edits(&mut editor, N);

    for i in (0..N).rev() {
        assert!(editor.undo());
        let expected = if i == 0 { &initial } else { &states[i - 1] };
        assert_eq!(editor.paint_layer(), expected);
    }
    assert!(!editor.undo());
    assert_eq!(editor.paint_layer(), &initial);

    for state in &states {
        assert!(editor.redo());
        assert_eq!(editor.paint_layer(), state);
    }
    assert!(!editor.redo());
}

#[test]
fn test_new_edit_after_undo_discards_redo() {
    const N: usize = 5;
    for undos in 1..=N {
        let mut editor = loaded_editor(400, 300, 400, 300);
        run_edits(&mut editor, N);

        for _ in 0..undos {
            editor.undo();
        }
        rect(&mut editor, 300.0, 200.0, 390.0, 290.0);
        let after = editor.paint_layer().clone();

        assert!(!editor.can_redo(), "redo left after {} undos", undos);
        assert!(!editor.redo());
        assert_eq!(editor.paint_layer(), &after);
        assert_eq!(editor.history().len(), N - undos + 2);
    }
}

#[test]
fn test_clear_is_undoable() {
    let mut editor = loaded_editor(100, 100, 100, 100);
    rect(&mut editor, 0.0, 0.0, 60.0, 60.0);
    let painted = editor.paint_layer().clone();

    editor.clear();
    assert!(transparent(&editor));
    editor.undo();
    assert_eq!(editor.paint_layer(), &painted);
}

#[test]
fn test_recolor_is_undoable() {
    let mut editor = loaded_editor(100, 100, 100, 100);
    rect(&mut editor, 0.0, 0.0, 60.0, 60.0);
    editor.set_brush_color(BLUE);
    assert_eq!(editor.paint_layer().get_pixel(5, 5), Some(Rgba([0, 0, 255, 255])));

    editor.undo();
    assert_eq!(editor.paint_layer().get_pixel(5, 5), Some(Rgba([255, 0, 0, 255])));
    assert_eq!(editor.tool_state().brush_color, BLUE);
}
