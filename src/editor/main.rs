mod app;
mod canvas;

use std::path::PathBuf;

use app::MaskEditorApp;
use clap::Parser;
use mask_painter::EditorConfig;

/// Interactive mask painter
#[derive(Parser, Debug)]
#[command(name = "mask-editor", version, about)]
struct Args {
    /// Image to open on start
    image: Option<PathBuf>,
    /// Canvas size in pixels
    #[arg(long, default_value_t = 500)]
    width: u32,
    #[arg(long, default_value_t = 600)]
    height: u32,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = EditorConfig::with_canvas(args.width, args.height);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([args.width as f32 + 80.0, args.height as f32 + 140.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Mask Editor",
        options,
        Box::new(move |cc| Ok(Box::new(MaskEditorApp::new(cc, config, args.image)?))),
    )
}
