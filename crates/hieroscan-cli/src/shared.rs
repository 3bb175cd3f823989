use std::path::Path;

use hieroscan::{
    GrayImage, Rect, SignLetterModel, SignNames, TranscribeOptions, Transcriber,
    load_sign_letter_model, open_image,
};

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Open an image with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is not found
/// or cannot be decoded.
pub fn load_image(file: &Path) -> Result<GrayImage, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    open_image(file).map_err(|e| {
        eprintln!("Error: failed to open image: {e}");
        1
    })
}

/// Build a transcriber from a model directory.
pub fn load_transcriber(model: &Path) -> Result<Transcriber, i32> {
    Transcriber::from_model_dir(model, TranscribeOptions::default()).map_err(|e| {
        eprintln!("Error: failed to load model from {}: {e}", model.display());
        1
    })
}

pub fn load_names(file: &Path) -> Result<SignNames, i32> {
    SignNames::load(file).map_err(|e| {
        eprintln!("Error: failed to load sign names from {}: {e}", file.display());
        1
    })
}

pub fn load_locator(file: &Path) -> Result<SignLetterModel, i32> {
    load_sign_letter_model(file).map_err(|e| {
        eprintln!("Error: failed to load locator from {}: {e}", file.display());
        1
    })
}

/// Parse a region given as `x,y,w,h`.
pub fn parse_region(text: &str) -> Result<Rect, String> {
    let numbers = text
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid region '{text}': '{}' is not a number", part.trim()))
        })
        .collect::<Result<Vec<u32>, String>>()?;
    match numbers[..] {
        [x, y, w, h] if w > 0 && h > 0 => Ok(Rect::new(x, y, w, h)),
        [_, _, _, _] => Err(format!("invalid region '{text}': width and height must be positive")),
        _ => Err(format!("invalid region '{text}': expected x,y,w,h")),
    }
}
