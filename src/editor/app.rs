use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use eframe::egui;
use image::{DynamicImage, Rgb};
use mask_painter::{
    EditorConfig, EditorError, EncodedMask, FileFetcher, LoadError, LoadTicket, MaskEditor, Tool,
    fetch_and_decode,
};

use super::canvas::{CanvasView, render_canvas};

type LoadMessage = (LoadTicket, String, Result<DynamicImage, LoadError>);

pub struct MaskEditorApp {
    editor: MaskEditor,
    view: CanvasView,
    status_message: String,
    /// Decoded images arrive here from loader threads
    load_tx: Sender<LoadMessage>,
    load_rx: Receiver<LoadMessage>,
    /// Source currently being fetched, if any
    loading: Option<String>,
}

impl MaskEditorApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: EditorConfig,
        initial_image: Option<PathBuf>,
    ) -> Result<Self, EditorError> {
        let (load_tx, load_rx) = mpsc::channel();
        let mut app = Self {
            editor: MaskEditor::new(config)?,
            view: CanvasView::new(),
            status_message: String::from("Ready - Open an image to begin painting a mask"),
            load_tx,
            load_rx,
            loading: None,
        };

        if let Some(path) = initial_image {
            app.start_load(path.to_string_lossy().into_owned());
        }

        Ok(app)
    }

    fn start_load(&mut self, url: String) {
        let ticket = self.editor.begin_load();
        let tx = self.load_tx.clone();
        let thread_url = url.clone();

        thread::spawn(move || {
            let result = fetch_and_decode(&FileFetcher, &thread_url);
            // The receiver only disappears when the app is closing
            let _ = tx.send((ticket, thread_url, result));
        });

        self.status_message = format!("Loading {} ...", url);
        self.loading = Some(url);
    }

    fn poll_loads(&mut self) {
        while let Ok((ticket, url, result)) = self.load_rx.try_recv() {
            match self.editor.finish_load(ticket, result) {
                Ok(true) => {
                    let (w, h) = self.editor.original_image_size().unwrap_or_default();
                    self.status_message = format!("Loaded: {} ({}x{})", url, w, h);
                    self.loading = None;
                    self.view.invalidate();
                }
                Ok(false) => {}
                Err(e) => {
                    self.status_message = format!("Error loading {}: {}", url, e);
                    self.loading = None;
                }
            }
        }
    }

    fn open_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file()
        {
            self.start_load(path.to_string_lossy().into_owned());
        }
    }

    fn save_file(&mut self) {
        if !self.editor.is_ready() {
            self.status_message = String::from("Nothing to save - open an image first");
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(EncodedMask::FILE_NAME)
            .save_file()
        else {
            return;
        };

        let mut written = None;
        self.editor.save(|mask| {
            written = Some(fs::write(&path, &mask.bytes).map(|_| (mask.width, mask.height)));
        });

        self.status_message = match written {
            Some(Ok((w, h))) => format!("Saved {}x{} mask to {}", w, h, path.display()),
            Some(Err(e)) => format!("Error saving {}: {}", path.display(), e),
            None => String::from("Mask export failed"),
        };
    }

    fn undo(&mut self) {
        if self.editor.undo() {
            self.status_message = format!(
                "Undo ({} more available)",
                self.editor.history().undo_count()
            );
        }
    }

    fn redo(&mut self) {
        if self.editor.redo() {
            self.status_message = format!(
                "Redo ({} more available)",
                self.editor.history().redo_count()
            );
        }
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Open Image").clicked() {
                self.open_file();
            }
            if ui
                .add_enabled(self.editor.is_ready(), egui::Button::new("Save Mask"))
                .clicked()
            {
                self.save_file();
            }

            ui.separator();

            if ui
                .add_enabled(self.editor.can_undo(), egui::Button::new("↶ Undo"))
                .on_hover_text("Ctrl+Z")
                .clicked()
            {
                self.undo();
            }
            if ui
                .add_enabled(self.editor.can_redo(), egui::Button::new("↷ Redo"))
                .on_hover_text("Ctrl+Y or Ctrl+Shift+Z")
                .clicked()
            {
                self.redo();
            }
            if ui
                .add_enabled(self.editor.is_ready(), egui::Button::new("Clear"))
                .clicked()
            {
                self.editor.clear();
                self.status_message = String::from("Mask cleared");
            }

            ui.separator();

            ui.label("Tool:");
            let active = self.editor.tool_state().active_tool;
            for tool in Tool::ALL {
                if ui.selectable_label(active == tool, tool.label()).clicked() {
                    self.editor.set_tool(tool);
                }
            }
        });

        ui.horizontal(|ui| {
            let state = *self.editor.tool_state();

            let mut size = state.brush_size_px;
            if ui
                .add(egui::Slider::new(&mut size, 1..=100).text("Brush size"))
                .changed()
            {
                self.editor.set_brush_size(size);
            }

            ui.separator();

            ui.label("Mask color:");
            let Rgb(mut rgb) = state.brush_color;
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                self.editor.set_brush_color(Rgb(rgb));
            }

            ui.separator();

            let mut opacity = state.mask_opacity;
            if ui
                .add(egui::Slider::new(&mut opacity, 0.0..=1.0).text("Mask opacity"))
                .changed()
            {
                self.editor.set_mask_opacity(opacity);
            }
        });
    }
}

impl eframe::App for MaskEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loads();

        // Handle keyboard shortcuts
        let mut do_undo = false;
        let mut do_redo = false;

        ctx.input(|i| {
            // Undo: Ctrl+Z
            if i.key_pressed(egui::Key::Z) && i.modifiers.command && !i.modifiers.shift {
                do_undo = true;
            }
            // Redo: Ctrl+Y or Ctrl+Shift+Z
            if i.key_pressed(egui::Key::Y) && i.modifiers.command {
                do_redo = true;
            }
            if i.key_pressed(egui::Key::Z) && i.modifiers.command && i.modifiers.shift {
                do_redo = true;
            }
        });

        if do_undo {
            self.undo();
        }
        if do_redo {
            self.redo();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.render_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some((w, h)) = self.editor.original_image_size() {
                        ui.label(format!("Image: {} x {}", w, h));
                    }
                    ui.label(format!(
                        "Undo: {} | Redo: {}",
                        self.editor.history().undo_count(),
                        self.editor.history().redo_count()
                    ));
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            render_canvas(ui, &mut self.editor, &mut self.view);
        });

        if self.loading.is_some() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}
