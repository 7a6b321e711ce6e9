//! Integration tests for edit scripts replayed on a live editor.

use image::{DynamicImage, Rgba, RgbaImage};
use mask_painter::mask::MASK_FOREGROUND;
use mask_painter::script::{parse_script, run_script};
use mask_painter::{EditorConfig, MaskEditor, Tool};

fn loaded_editor() -> MaskEditor {
    let mut editor = MaskEditor::new(EditorConfig::with_canvas(200, 200)).unwrap();
    let image = RgbaImage::from_pixel(400, 400, Rgba([10, 20, 30, 255]));
    editor.set_image(&DynamicImage::ImageRgba8(image)).unwrap();
    editor
}

fn run(editor: &mut MaskEditor, source: &str) {
    let commands = parse_script(source).unwrap();
    run_script(editor, &commands);
}

#[test]
fn test_rect_script_exports_quarter() {
    let mut editor = loaded_editor();
    run(&mut editor, "rect 0 0 100 100\n");

    let mask = editor.export_mask().unwrap();
    assert_eq!(mask.dimensions(), (400, 400));
    // Column and row 199 map to canvas 99.5, which rounds past the rectangle
    let black = mask.pixels().filter(|p| **p == MASK_FOREGROUND).count();
    assert_eq!(black, 199 * 199);
}

#[test]
fn test_script_undo_redo() {
    let mut editor = loaded_editor();
    run(
        &mut editor,
        "# two edits, one undone
         rect 0 0 50 50
         stroke 100 100 150 150
         undo
        ",
    );
    assert_eq!(editor.history().len(), 3);
    assert!(editor.can_redo());
    assert_eq!(editor.paint_layer().get_pixel(25, 25).unwrap()[3], 255);
    assert_eq!(editor.paint_layer().get_pixel(125, 125).unwrap()[3], 0);

    run(&mut editor, "redo");
    assert_eq!(editor.paint_layer().get_pixel(125, 125).unwrap()[3], 255);
}

#[test]
fn test_rect_and_fill_restore_active_tool() {
    let mut editor = loaded_editor();
    run(
        &mut editor,
        "tool eraser
         rect 10 10 20 20
         fill 150 150",
    );
    assert_eq!(editor.tool_state().active_tool, Tool::Eraser);
    assert!(editor.paint_layer().has_paint());
}

#[test]
fn test_settings_commands() {
    let mut editor = loaded_editor();
    run(
        &mut editor,
        "size 33
         color 0 128 255
         opacity 0.8
         stroke 50 50",
    );

    let state = editor.tool_state();
    assert_eq!(state.brush_size_px, 33);
    assert_eq!(state.brush_color.0, [0, 128, 255]);
    assert!((state.mask_opacity - 0.8).abs() < 1e-6);
    // A single-point stroke leaves a dot
    assert_eq!(
        editor.paint_layer().get_pixel(50, 50),
        Some(Rgba([0, 128, 255, 255]))
    );
}

#[test]
fn test_raw_pointer_events_with_leave() {
    let mut editor = loaded_editor();
    run(
        &mut editor,
        "tool rectangle
         down 10 10
         move 60 40
         leave",
    );
    assert!(editor.phase().is_idle());
    assert_eq!(editor.paint_layer().get_pixel(59, 39).unwrap()[3], 255);
    assert_eq!(editor.paint_layer().get_pixel(60, 40).unwrap()[3], 0);
}

#[test]
fn test_clear_command() {
    let mut editor = loaded_editor();
    run(&mut editor, "rect 0 0 200 200\nclear");
    assert!(!editor.paint_layer().has_paint());
    run(&mut editor, "undo");
    assert!(editor.paint_layer().has_paint());
}

#[test]
fn test_parse_errors_report_line() {
    let err = parse_script("size 3\n\n# fine\nrect 1 2 3\n").unwrap_err();
    assert_eq!(err.line, 4);
    assert!(err.to_string().starts_with("line 4:"));

    assert!(parse_script("paint 1 2").is_err());
    assert!(parse_script("tool pencil").is_err());
    assert!(parse_script("color 0 0 256").is_err());
    assert!(parse_script("stroke 1 2 3").is_err());
    assert!(parse_script("undo now").is_err());
}

#[test]
fn test_script_before_load_is_ignored() {
    let mut editor = MaskEditor::new(EditorConfig::with_canvas(200, 200)).unwrap();
    run(&mut editor, "rect 0 0 100 100\nfill 150 150");
    assert!(!editor.paint_layer().has_paint());
    assert!(editor.export_mask().is_none());
}
