//! Finding the areas of a mixed page that contain hieroglyphs.
//!
//! Components are told apart from Latin letters by a separate
//! nearest-neighbour table and by their size relative to the typical
//! letter height. Large hieroglyphs seed regions which then grow over
//! nearby components that also look like hieroglyphs.

use image::GrayImage;

use crate::aspect::AspectGate;
use crate::embedding::{Embedder, check_len, squared_distance};
use crate::error::HieroError;
use crate::geometry::Rect;
use crate::segment::Segment;
use crate::segmentation::{
    Connectivity, MIN_INK_DENSITY, MIN_SEGMENT_AREA, SegmentOptions, segment_image,
};

/// Ink threshold used when scanning whole pages.
pub const LOCATE_THRESHOLD: u8 = 110;

/// One labelled shape of the sign/letter table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeEntry {
    pub embedding: Vec<f32>,
    pub aspect: f64,
    /// `true` for hieroglyphs, `false` for letters and other marks.
    pub is_sign: bool,
}

/// Nearest-neighbour table distinguishing hieroglyphs from letters.
#[derive(Debug, Clone)]
pub struct SignLetterModel {
    embedder: Embedder,
    entries: Vec<ShapeEntry>,
}

impl SignLetterModel {
    pub fn new(embedder: Embedder, entries: Vec<ShapeEntry>) -> Result<Self, HieroError> {
        embedder.validate()?;
        if entries.is_empty() {
            return Err(HieroError::InvalidModel("sign/letter table is empty".to_string()));
        }
        let dim = embedder.output_dim();
        for (i, entry) in entries.iter().enumerate() {
            check_len(&format!("shape entry {i}"), dim, entry.embedding.len())?;
            if !(entry.aspect.is_finite() && entry.aspect > 0.0) {
                return Err(HieroError::InvalidModel(format!(
                    "shape entry {i} has aspect ratio {}",
                    entry.aspect
                )));
            }
        }
        Ok(Self { embedder, entries })
    }

    pub fn entries(&self) -> &[ShapeEntry] {
        &self.entries
    }

    /// Is the nearest shape of compatible aspect a hieroglyph?
    pub fn closest_is_sign(&self, image: &GrayImage, gate: &AspectGate) -> bool {
        let embedding = self.embedder.embed(image);
        let aspect = f64::from(image.width()) / f64::from(image.height());
        self.entries
            .iter()
            .filter(|e| gate.similar(aspect, e.aspect))
            .min_by(|a, b| {
                squared_distance(&embedding, &a.embedding)
                    .total_cmp(&squared_distance(&embedding, &b.embedding))
            })
            .is_some_and(|e| e.is_sign)
    }
}

/// Options for [`locate_regions`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocateOptions {
    pub segment: SegmentOptions,
    pub aspect_gate: AspectGate,
    /// Shapes narrower or lower than this many unit heights are no signs.
    pub min_relative_size: f64,
    /// Shapes taller than this many unit heights are no signs.
    pub max_relative_height: f64,
    /// Seeds must be taller than this many unit heights.
    pub seed_relative_height: f64,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            segment: SegmentOptions {
                threshold: LOCATE_THRESHOLD,
                connectivity: Connectivity::Four,
                min_area: Some(MIN_SEGMENT_AREA),
                min_ink_density: Some(MIN_INK_DENSITY),
            },
            aspect_gate: AspectGate::default(),
            min_relative_size: 0.5,
            max_relative_height: 3.0,
            seed_relative_height: 1.9,
        }
    }
}

/// Are two boxes near enough to belong to the same region?
///
/// Together they may span at most three units vertically, and they must
/// be less than two units apart along one axis while overlapping along the
/// other.
pub fn close_to(a: &Rect, b: &Rect, unit: f64) -> bool {
    let top = f64::from(a.y.min(b.y));
    let bottom = f64::from(a.bottom().max(b.bottom()));
    if bottom - top > 3.0 * unit {
        return false;
    }
    let (ax, ay, ar, ab) = edges(a);
    let (bx, by, br, bb) = edges(b);
    let gap = 2.0 * unit;
    (bx < ar + gap && ax < br + gap && ay < bb && by < ab)
        || (by < ab + gap && ay < bb + gap && ax < br && bx < ar)
}

fn edges(r: &Rect) -> (f64, f64, f64, f64) {
    (
        f64::from(r.x),
        f64::from(r.y),
        f64::from(r.right()),
        f64::from(r.bottom()),
    )
}

fn median(values: &mut [u32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(f64::from(values[mid]))
    } else {
        Some((f64::from(values[mid - 1]) + f64::from(values[mid])) / 2.0)
    }
}

struct SizeRule<'a> {
    model: &'a SignLetterModel,
    options: &'a LocateOptions,
    unit: f64,
}

impl SizeRule<'_> {
    fn is_sign(&self, segment: &Segment, seed: bool) -> bool {
        let rel_width = f64::from(segment.width()) / self.unit;
        let rel_height = f64::from(segment.height()) / self.unit;
        if rel_width < self.options.min_relative_size || rel_height < self.options.min_relative_size {
            return false;
        }
        if rel_height > self.options.max_relative_height {
            return false;
        }
        if seed && rel_height <= self.options.seed_relative_height {
            return false;
        }
        self.model
            .closest_is_sign(segment.image(), &self.options.aspect_gate)
    }
}

/// Rectangles of `page` that contain hieroglyphic text, ordered top to
/// bottom and left to right.
pub fn locate_regions(page: &GrayImage, model: &SignLetterModel, options: &LocateOptions) -> Vec<Rect> {
    let mut segments = segment_image(page, &options.segment);
    segments.sort_by_key(Segment::y);
    let mut heights: Vec<u32> = segments.iter().map(Segment::height).collect();
    let Some(unit) = median(&mut heights) else {
        return Vec::new();
    };
    let rule = SizeRule {
        model,
        options,
        unit,
    };

    let (mut signs, mut rest): (Vec<Segment>, Vec<Segment>) =
        segments.into_iter().partition(|s| rule.is_sign(s, true));
    tracing::debug!(unit, seeds = signs.len(), "located seed signs");

    let mut changed = !signs.is_empty();
    while changed {
        changed = false;
        let mut i = 0;
        while i < rest.len() {
            let rect = rest[i].rect();
            if signs.iter().any(|s| close_to(&rect, &s.rect(), unit)) && rule.is_sign(&rest[i], false) {
                signs.push(rest.remove(i));
                changed = true;
            } else {
                i += 1;
            }
        }
    }

    let mut regions: Vec<Rect> = signs.iter().map(Segment::rect).collect();
    let mut changed = !regions.is_empty();
    while changed {
        changed = false;
        let mut i = 0;
        while i < regions.len() {
            let mut j = i + 1;
            while j < regions.len() {
                if close_to(&regions[i], &regions[j], unit) {
                    let other = regions.remove(j);
                    regions[i] = regions[i].union(&other);
                    changed = true;
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
    }

    regions.sort_by_key(|r| (r.y, r.x));
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    use crate::segment::WHITE;

    fn model() -> SignLetterModel {
        SignLetterModel::new(
            Embedder::raw(4),
            vec![
                ShapeEntry {
                    embedding: vec![0.0; 16],
                    aspect: 1.0,
                    is_sign: true,
                },
                ShapeEntry {
                    embedding: vec![0.0; 16],
                    aspect: 0.6,
                    is_sign: false,
                },
            ],
        )
        .unwrap()
    }

    fn fill(page: &mut GrayImage, x: u32, y: u32, w: u32, h: u32) {
        for px in x..x + w {
            for py in y..y + h {
                page.put_pixel(px, py, Luma([0]));
            }
        }
    }

    #[test]
    fn close_to_rules() {
        let unit = 10.0;
        let a = Rect::new(0, 0, 10, 10);
        assert!(close_to(&a, &Rect::new(25, 2, 10, 10), unit));
        assert!(!close_to(&a, &Rect::new(30, 2, 10, 10), unit));
        assert!(close_to(&a, &Rect::new(2, 25, 10, 5), unit));
        // Diagonal neighbours overlap on neither axis.
        assert!(!close_to(&a, &Rect::new(12, 12, 10, 10), unit));
        // Too tall together.
        assert!(!close_to(&a, &Rect::new(5, 5, 10, 30), unit));
    }

    #[test]
    fn median_of_heights() {
        assert_eq!(median(&mut []), None);
        assert_eq!(median(&mut [3, 1, 2]), Some(2.0));
        assert_eq!(median(&mut [4, 1, 2, 3]), Some(2.5));
    }

    #[test]
    fn finds_sign_region_among_letters() {
        let mut page = GrayImage::from_pixel(160, 40, Luma([WHITE]));
        for x in [10, 20, 30, 40, 50, 80] {
            fill(&mut page, x, 10, 6, 10);
        }
        fill(&mut page, 100, 5, 25, 25);
        fill(&mut page, 130, 8, 12, 12);

        let regions = locate_regions(&page, &model(), &LocateOptions::default());
        assert_eq!(regions, vec![Rect::new(100, 5, 42, 25)]);
    }

    #[test]
    fn page_without_ink_has_no_regions() {
        let page = GrayImage::from_pixel(20, 20, Luma([WHITE]));
        assert!(locate_regions(&page, &model(), &LocateOptions::default()).is_empty());
    }

    #[test]
    fn model_validation() {
        assert!(SignLetterModel::new(Embedder::raw(4), Vec::new()).is_err());
        let bad = ShapeEntry {
            embedding: vec![0.0; 3],
            aspect: 1.0,
            is_sign: true,
        };
        assert!(matches!(
            SignLetterModel::new(Embedder::raw(4), vec![bad]),
            Err(HieroError::DimensionMismatch { .. })
        ));
    }
}
