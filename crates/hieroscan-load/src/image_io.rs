//! Decoding raster images into grayscale buffers.

use std::path::Path;

use image::GrayImage;

use crate::error::LoadError;

/// Open an image file and convert it to 8-bit grayscale.
pub fn open_image(path: impl AsRef<Path>) -> Result<GrayImage, LoadError> {
    let path = path.as_ref();
    let image = image::open(path)?.to_luma8();
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "opened image"
    );
    Ok(image)
}

/// Decode an in-memory image and convert it to 8-bit grayscale.
pub fn decode_image(bytes: &[u8]) -> Result<GrayImage, LoadError> {
    Ok(image::load_from_memory(bytes)?.to_luma8())
}
