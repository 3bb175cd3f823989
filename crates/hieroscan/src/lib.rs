//! hieroscan: transcribe images of hieroglyphic text into Unicode.
//!
//! This is the public API facade crate. It re-exports types from
//! hieroscan-core and uses hieroscan-load to read models and images.
//!
//! # Architecture
//!
//! - **hieroscan-core**: Segmentation, classification and layout, free of I/O
//! - **hieroscan-load**: Model, image, name-table and region-file readers
//! - **hieroscan** (this crate): [`Transcriber`] and evaluation tying them together
//!
//! # Example
//!
//! ```no_run
//! use hieroscan::{Transcriber, TranscribeOptions, open_image};
//!
//! let transcriber = Transcriber::from_model_dir("model", TranscribeOptions::default())?;
//! let page = open_image("line.png")?;
//! let result = transcriber.transcribe(&page, None);
//! println!("{}", result.encoding);
//! # Ok::<(), hieroscan::LoadError>(())
//! ```

pub mod eval;
pub mod transcriber;

pub use hieroscan_core;
pub use hieroscan_load;

pub use eval::{EvalRecord, EvalSummary, evaluate_regions};
pub use hieroscan_core::{
    ClassifiedSegment, Connectivity, Corner, Direction, FontInfo, HieroError, Label,
    LayoutOptions, LocateOptions, PlacedSign, Rect, Segment, SegmentOptions, SignLetterModel,
    Structure, controls, locate_regions, segment_image,
};
pub use image::GrayImage;
pub use hieroscan_load::{
    LoadError, RegionRow, SignNames, load_font_info, load_sign_letter_model, open_image,
    read_regions, write_regions,
};
pub use transcriber::{TranscribeOptions, Transcriber, Transcription};
