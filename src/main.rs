use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use image::ImageFormat;
use mask_painter::script::{parse_script, run_script};
use mask_painter::{EditorConfig, MaskEditor, binarize_mask, inspect_mask};

/// Headless mask painting and mask file utilities
#[derive(Parser, Debug)]
#[command(name = "mask-tools", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load an image, replay an edit script on the canvas and export the mask
    Apply {
        /// Source image the mask is painted over
        #[arg(short, long)]
        image: PathBuf,
        /// Edit script (one command per line)
        #[arg(short, long)]
        script: PathBuf,
        /// Canvas size the script coordinates refer to
        #[arg(short, long, default_value = "500x600", value_parser = parse_canvas)]
        canvas: (u32, u32),
        /// Output PNG mask
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Threshold any mask image into a single-channel black/white PNG
    Binarize {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Check that a mask is alpha-free, two-tone and sized like its image
    Verify {
        #[arg(short, long)]
        mask: PathBuf,
        /// Image the mask belongs to
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

fn parse_canvas(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    let w = w.trim().parse::<u32>().map_err(|e| e.to_string())?;
    let h = h.trim().parse::<u32>().map_err(|e| e.to_string())?;
    Ok((w, h))
}

fn fail(code: i32, message: String) -> ! {
    eprintln!("{}", message);
    process::exit(code);
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Apply {
            image,
            script,
            canvas,
            output,
        } => apply(&image, &script, canvas, &output),
        Command::Binarize { input, output } => binarize(&input, &output),
        Command::Verify { mask, image } => verify(&mask, image.as_deref()),
    }
}

fn apply(image: &Path, script: &Path, canvas: (u32, u32), output: &Path) {
    let config = EditorConfig::with_canvas(canvas.0, canvas.1);
    let mut editor = MaskEditor::new(config).unwrap_or_else(|e| fail(1, format!("Error: {}", e)));

    if let Err(e) = editor.load_image(&image.to_string_lossy()) {
        fail(2, format!("Error loading image '{}': {}", image.display(), e));
    }

    let source = fs::read_to_string(script).unwrap_or_else(|e| {
        fail(1, format!("Error reading script '{}': {}", script.display(), e))
    });
    let commands = parse_script(&source).unwrap_or_else(|e| {
        fail(3, format!("Error in script '{}': {}", script.display(), e))
    });
    run_script(&mut editor, &commands);

    let mut written = None;
    editor.save(|mask| written = Some(fs::write(output, &mask.bytes).map(|_| mask)));

    match written {
        Some(Ok(mask)) => println!(
            "Wrote {}x{} mask to '{}'",
            mask.width,
            mask.height,
            output.display()
        ),
        Some(Err(e)) => fail(1, format!("Error writing '{}': {}", output.display(), e)),
        None => fail(1, "Error: no mask was produced".to_string()),
    }
}

fn binarize(input: &Path, output: &Path) {
    let img = image::open(input)
        .unwrap_or_else(|e| fail(2, format!("Error loading '{}': {}", input.display(), e)));

    let mask = binarize_mask(&img);
    if let Err(e) = mask.save_with_format(output, ImageFormat::Png) {
        fail(1, format!("Error writing '{}': {}", output.display(), e));
    }

    println!(
        "Binarized '{}' -> '{}' ({}x{})",
        input.display(),
        output.display(),
        mask.width(),
        mask.height()
    );
}

fn verify(mask: &Path, image: Option<&Path>) {
    let bytes = fs::read(mask)
        .unwrap_or_else(|e| fail(1, format!("Error reading '{}': {}", mask.display(), e)));
    let report = inspect_mask(&bytes)
        .unwrap_or_else(|e| fail(2, format!("Error decoding '{}': {}", mask.display(), e)));

    println!(
        "{}: {}x{}, alpha: {}, two-tone: {}, masked pixels: {}",
        mask.display(),
        report.width,
        report.height,
        report.has_alpha,
        report.is_binary,
        report.masked_pixels
    );

    let mut ok = report.is_valid();

    if let Some(image) = image {
        let (w, h) = image::image_dimensions(image)
            .unwrap_or_else(|e| fail(2, format!("Error reading '{}': {}", image.display(), e)));
        if (w, h) != (report.width, report.height) {
            eprintln!(
                "Size mismatch: mask is {}x{}, image is {}x{}",
                report.width, report.height, w, h
            );
            ok = false;
        }
    }

    if !ok {
        process::exit(4);
    }
}
