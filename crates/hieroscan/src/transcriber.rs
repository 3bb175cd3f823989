//! The image-to-Unicode pipeline.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use hieroscan_core::segmentation::MIN_SEGMENT_AREA;
use hieroscan_core::{
    ClassifiedSegment, ClassifyOptions, Direction, FontInfo, HieroError, Layout, LayoutOptions,
    PlacedSign, Rect, Segment, SegmentOptions, Structure, classify_segments, segment_image,
};
use hieroscan_load::{LoadError, load_font_info};
use image::GrayImage;

/// Options for every stage of transcription.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TranscribeOptions {
    pub segment: SegmentOptions,
    pub classify: ClassifyOptions,
    pub layout: LayoutOptions,
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self {
            segment: SegmentOptions {
                min_area: Some(MIN_SEGMENT_AREA),
                ..SegmentOptions::default()
            },
            classify: ClassifyOptions::default(),
            layout: LayoutOptions::default(),
        }
    }
}

/// Result of transcribing one image or region.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    /// Signs and format controls.
    pub encoding: String,
    /// Top-level groups in reading order, normalized.
    pub structures: Vec<Structure>,
    /// Every classified segment, in page coordinates.
    pub signs: Vec<ClassifiedSegment>,
    pub direction: Direction,
}

impl Transcription {
    fn empty(direction: Direction) -> Self {
        Self {
            encoding: String::new(),
            structures: Vec::new(),
            signs: Vec::new(),
            direction,
        }
    }

    /// The resolved signs with their boxes.
    pub fn placed_signs(&self) -> Vec<PlacedSign> {
        self.signs
            .iter()
            .filter_map(PlacedSign::from_classified)
            .collect()
    }
}

/// Transcribes images of hieroglyphic text against a shared prototype
/// database.
///
/// A `Transcriber` holds no per-image state; one instance may serve many
/// threads.
#[derive(Debug, Clone)]
pub struct Transcriber {
    font: Arc<FontInfo>,
    options: TranscribeOptions,
}

impl Transcriber {
    pub fn new(font: Arc<FontInfo>, options: TranscribeOptions) -> Self {
        Self { font, options }
    }

    /// Load the prototype database from a model directory.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if `model.json` is missing or invalid.
    pub fn from_model_dir(dir: impl AsRef<Path>, options: TranscribeOptions) -> Result<Self, LoadError> {
        Ok(Self::new(Arc::new(load_font_info(dir)?), options))
    }

    pub fn font(&self) -> &FontInfo {
        &self.font
    }

    pub fn options(&self) -> &TranscribeOptions {
        &self.options
    }

    /// Transcribe a whole image. Without a direction, images taller than
    /// wide are read vertically.
    pub fn transcribe(&self, image: &GrayImage, direction: Option<Direction>) -> Transcription {
        let direction = direction.unwrap_or_else(|| Direction::infer(image.width(), image.height()));
        let segments = segment_image(image, &self.options.segment);
        self.transcribe_segments(segments, direction)
    }

    /// Transcribe the `rect` area of `page`.
    ///
    /// With `regrow`, segments cut by the edge of `rect` are followed
    /// outward over the whole page first, so that signs sticking out of
    /// the region are recognized whole.
    ///
    /// # Errors
    ///
    /// Returns [`HieroError::RegionOutOfBounds`] if `rect` is empty or not
    /// inside the page.
    pub fn transcribe_region(
        &self,
        page: &GrayImage,
        rect: Rect,
        direction: Option<Direction>,
        regrow: bool,
    ) -> Result<Transcription, HieroError> {
        let crop = Segment::from_page_rect(page, rect).ok_or(HieroError::RegionOutOfBounds {
            region: (rect.x, rect.y, rect.width, rect.height),
            page: page.dimensions(),
        })?;
        let direction = direction.unwrap_or_else(|| Direction::infer(rect.width, rect.height));

        let mut segments: Vec<Segment> = segment_image(crop.image(), &self.options.segment)
            .into_iter()
            .map(|s| s.translate(rect.x, rect.y))
            .collect();

        if regrow {
            let threshold = self.options.segment.threshold;
            let mut seen = HashSet::new();
            segments = segments
                .into_iter()
                .map(|s| {
                    if touches_edge(&s.rect(), &rect) {
                        s.recreate_from_page(page, threshold)
                    } else {
                        s
                    }
                })
                // Pieces of one component cut apart by the region regrow to the same box.
                .filter(|s| seen.insert(s.rect()))
                .collect();
        }

        Ok(self.transcribe_segments(segments, direction))
    }

    /// Classify segments and lay them out.
    pub fn transcribe_segments(&self, segments: Vec<Segment>, direction: Direction) -> Transcription {
        if segments.is_empty() {
            return Transcription::empty(direction);
        }
        let signs = classify_segments(segments, &self.font, &self.options.classify);
        let placed: Vec<PlacedSign> = signs.iter().filter_map(PlacedSign::from_classified).collect();
        let structures = Layout::new(self.font.anchor_table(), &self.options.layout)
            .structures(&placed, direction);
        let encoding = structures.iter().map(Structure::to_unicode).collect();
        tracing::debug!(
            signs = placed.len(),
            groups = structures.len(),
            ?direction,
            "transcribed"
        );
        Transcription {
            encoding,
            structures,
            signs,
            direction,
        }
    }

    /// Transcribe several images, in parallel with the `parallel` feature.
    /// Results are in input order.
    pub fn transcribe_batch(&self, images: &[GrayImage], direction: Option<Direction>) -> Vec<Transcription> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            images
                .par_iter()
                .map(|image| self.transcribe(image, direction))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            images
                .iter()
                .map(|image| self.transcribe(image, direction))
                .collect()
        }
    }
}

fn touches_edge(segment: &Rect, region: &Rect) -> bool {
    segment.x == region.x
        || segment.y == region.y
        || segment.right() == region.right()
        || segment.bottom() == region.bottom()
}
