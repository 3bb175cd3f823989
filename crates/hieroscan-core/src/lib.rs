//! hieroscan-core: I/O-free data types and algorithms.
//!
//! This crate provides the foundational types (Rect, Segment, Structure,
//! FontInfo, etc.) and algorithms (connected-component segmentation,
//! nearest-neighbour classification, layout reconstruction, Unicode
//! serialization) used by hieroscan. It reads no files; databases are
//! constructed in memory and validated by [`FontInfo::new`].

pub mod aspect;
pub mod classify;
pub mod controls;
pub mod embedding;
pub mod error;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod locate;
pub mod partition;
pub mod segment;
pub mod segmentation;
pub mod structure;

pub use aspect::AspectGate;
pub use classify::{
    AspectFallback, Candidate, ClassifiedSegment, ClassifyOptions, Label, Resolution,
    classify_core, classify_segments, correct_strokes, resolve_composite, resolve_composites,
};
pub use embedding::{Embedder, Pca, Standardizer, squared_distance};
pub use error::HieroError;
pub use font::{AnchorTable, Corner, CornerAnchors, FontInfo, PartBox, Prototype, Shape};
pub use geometry::Rect;
pub use layout::{DamagePolicy, Direction, Layout, LayoutOptions, PlacedSign, encode_signs};
pub use locate::{LocateOptions, ShapeEntry, SignLetterModel, close_to, locate_regions};
pub use partition::{Axis, Bounded, partition_horizontal, partition_vertical};
pub use segment::{InkPixel, Segment};
pub use segmentation::{Connectivity, SegmentOptions, segment_image};
pub use structure::Structure;
