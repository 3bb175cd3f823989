//! hieroscan-load: reading the files hieroscan works with.
//!
//! Raster images are decoded and converted to grayscale. The prototype
//! database, the sign/letter locator table and the sign-name table are read
//! from JSON; region files are plain text. All failures surface as
//! [`LoadError`] so that a broken model is reported before any image is
//! processed.

pub mod error;
pub mod image_io;
pub mod locator;
pub mod model;
pub mod names;
pub mod regions;

pub use error::LoadError;
pub use hieroscan_core;
pub use image_io::{decode_image, open_image};
pub use locator::{load_sign_letter_model, parse_sign_letter_model};
pub use model::{MODEL_FILE, ModelFile, load_font_info, parse_font_info};
pub use names::SignNames;
pub use regions::{RegionRow, format_regions, parse_regions, read_regions, write_regions};
