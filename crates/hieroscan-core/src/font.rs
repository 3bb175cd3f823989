//! The prototype database: trained embeddings of known signs, the layout of
//! their detached parts, and where other signs may be inserted into them.

use std::collections::{BTreeMap, HashMap};

use image::GrayImage;

use crate::controls;
use crate::embedding::{Embedder, check_len};
use crate::error::HieroError;
use crate::geometry::Rect;

/// Embedding and aspect ratio of one rendering of a sign.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shape {
    pub embedding: Vec<f32>,
    /// Width divided by height.
    pub aspect: f64,
}

/// Position and size of one detached part of a composite sign, relative
/// to its core component.
///
/// `x` and `y` locate the part's midpoint from the core's top-left corner.
/// All four values are divided by `max(core_width, core_height)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PartBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl PartBox {
    /// Where `part` lies relative to `core`.
    pub fn relative(core: &Rect, part: &Rect) -> Self {
        let unit = f64::from(core.width.max(core.height));
        let (x_mid, y_mid) = part.center();
        Self {
            x: (x_mid - f64::from(core.x)) / unit,
            y: (y_mid - f64::from(core.y)) / unit,
            w: f64::from(part.width) / unit,
            h: f64::from(part.height) / unit,
        }
    }

    /// Do all four coordinates differ by less than `epsilon`?
    pub fn similar(&self, other: &PartBox, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.w - other.w).abs() < epsilon
            && (self.h - other.h).abs() < epsilon
    }
}

/// A known sign.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prototype {
    pub sign: char,
    /// The largest connected component on its own.
    pub core: Shape,
    /// The whole sign including detached parts, if it has any.
    pub full: Option<Shape>,
    pub parts: Vec<PartBox>,
}

/// Insertion slots of a sign, in canonical serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Corner {
    TopStart,
    BottomStart,
    TopEnd,
    BottomEnd,
    Middle,
    Top,
    Bottom,
}

impl Corner {
    pub const ALL: [Corner; 7] = [
        Corner::TopStart,
        Corner::BottomStart,
        Corner::TopEnd,
        Corner::BottomEnd,
        Corner::Middle,
        Corner::Top,
        Corner::Bottom,
    ];

    /// The format control that introduces an insertion at this corner.
    pub fn control(self) -> char {
        match self {
            Corner::TopStart => controls::TS,
            Corner::BottomStart => controls::BS,
            Corner::TopEnd => controls::TE,
            Corner::BottomEnd => controls::BE,
            Corner::Middle => controls::M,
            Corner::Top => controls::T,
            Corner::Bottom => controls::B,
        }
    }

    /// Anchor position relative to the core's box, in units of its width
    /// and height.
    pub fn default_anchor(self) -> (f64, f64) {
        match self {
            Corner::TopStart => (0.0, 0.0),
            Corner::BottomStart => (0.0, 1.0),
            Corner::TopEnd => (1.0, 0.0),
            Corner::BottomEnd => (1.0, 1.0),
            Corner::Middle => (0.5, 0.5),
            Corner::Top => (0.5, 0.0),
            Corner::Bottom => (0.5, 1.0),
        }
    }

    /// Short name used in model files.
    pub fn code(self) -> &'static str {
        match self {
            Corner::TopStart => "ts",
            Corner::BottomStart => "bs",
            Corner::TopEnd => "te",
            Corner::BottomEnd => "be",
            Corner::Middle => "m",
            Corner::Top => "t",
            Corner::Bottom => "b",
        }
    }

    pub fn from_code(code: &str) -> Option<Corner> {
        Corner::ALL.into_iter().find(|c| c.code() == code)
    }
}

/// The corners at which a sign accepts insertions, with their anchors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CornerAnchors {
    anchors: BTreeMap<Corner, (f64, f64)>,
}

impl CornerAnchors {
    pub fn new(anchors: BTreeMap<Corner, (f64, f64)>) -> Self {
        Self { anchors }
    }

    /// All seven corners at their default anchors.
    pub fn with_defaults() -> Self {
        Self::new(Corner::ALL.into_iter().map(|c| (c, c.default_anchor())).collect())
    }

    /// The given corners, each at its default anchor unless a coordinate
    /// is overridden.
    pub fn from_overrides<I>(corners: I) -> Self
    where
        I: IntoIterator<Item = (Corner, Option<f64>, Option<f64>)>,
    {
        Self::new(
            corners
                .into_iter()
                .map(|(corner, x, y)| {
                    let (dx, dy) = corner.default_anchor();
                    (corner, (x.unwrap_or(dx), y.unwrap_or(dy)))
                })
                .collect(),
        )
    }

    pub fn get(&self, corner: Corner) -> Option<(f64, f64)> {
        self.anchors.get(&corner).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Corner, (f64, f64))> + '_ {
        self.anchors.iter().map(|(c, a)| (*c, *a))
    }

    /// The corner whose anchor is closest to `(x, y)`. Ties go to the
    /// corner earlier in canonical order.
    pub fn nearest(&self, (x, y): (f64, f64)) -> Option<Corner> {
        let mut best: Option<(Corner, f64)> = None;
        for (corner, (ax, ay)) in self.iter() {
            let dist = (ax - x) * (ax - x) + (ay - y) * (ay - y);
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((corner, dist));
            }
        }
        best.map(|(corner, _)| corner)
    }
}

/// Insertion anchors per core sign.
pub type AnchorTable = HashMap<char, CornerAnchors>;

/// Validated, read-only prototype database.
#[derive(Debug, Clone)]
pub struct FontInfo {
    embedder: Embedder,
    prototypes: Vec<Prototype>,
    anchors: AnchorTable,
}

impl FontInfo {
    /// Build a database, checking that every embedding matches the
    /// embedder's output and that every aspect ratio is usable.
    pub fn new(
        embedder: Embedder,
        prototypes: Vec<Prototype>,
        anchors: AnchorTable,
    ) -> Result<Self, HieroError> {
        embedder.validate()?;
        if prototypes.is_empty() {
            return Err(HieroError::InvalidModel("no prototypes".to_string()));
        }
        let dim = embedder.output_dim();
        for (i, prototype) in prototypes.iter().enumerate() {
            check_shape(&format!("core shape of prototype {i}"), &prototype.core, dim)?;
            if let Some(full) = &prototype.full {
                check_shape(&format!("full shape of prototype {i}"), full, dim)?;
            }
            if !prototype.parts.is_empty() && prototype.full.is_none() {
                return Err(HieroError::InvalidModel(format!(
                    "prototype {i} has parts but no full shape"
                )));
            }
        }
        Ok(Self {
            embedder,
            prototypes,
            anchors,
        })
    }

    pub fn embedder(&self) -> &Embedder {
        &self.embedder
    }

    pub fn prototypes(&self) -> &[Prototype] {
        &self.prototypes
    }

    pub fn prototype(&self, index: usize) -> Option<&Prototype> {
        self.prototypes.get(index)
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// Insertion anchors of `sign`, if it accepts insertions at all.
    pub fn anchors(&self, sign: char) -> Option<&CornerAnchors> {
        self.anchors.get(&sign)
    }

    pub fn anchor_table(&self) -> &AnchorTable {
        &self.anchors
    }

    pub fn embed(&self, image: &GrayImage) -> Vec<f32> {
        self.embedder.embed(image)
    }
}

fn check_shape(context: &str, shape: &Shape, dim: usize) -> Result<(), HieroError> {
    check_len(context, dim, shape.embedding.len())?;
    if !(shape.aspect.is_finite() && shape.aspect > 0.0) {
        return Err(HieroError::InvalidModel(format!(
            "{context} has aspect ratio {}",
            shape.aspect
        )));
    }
    if shape.embedding.iter().any(|v| !v.is_finite()) {
        return Err(HieroError::InvalidModel(format!("{context} is not finite")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(dim: usize, aspect: f64) -> Shape {
        Shape {
            embedding: vec![0.0; dim],
            aspect,
        }
    }

    fn prototype(sign: char, dim: usize) -> Prototype {
        Prototype {
            sign,
            core: shape(dim, 1.0),
            full: None,
            parts: Vec::new(),
        }
    }

    #[test]
    fn corner_order_is_canonical() {
        let mut shuffled = vec![Corner::Bottom, Corner::TopStart, Corner::Middle, Corner::BottomStart];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Corner::TopStart, Corner::BottomStart, Corner::Middle, Corner::Bottom]
        );
        for corner in Corner::ALL {
            assert_eq!(Corner::from_code(corner.code()), Some(corner));
        }
        assert_eq!(Corner::from_code("x"), None);
        assert_eq!(Corner::TopStart.control(), controls::TS);
    }

    #[test]
    fn nearest_corner_uses_anchors() {
        let anchors = CornerAnchors::with_defaults();
        assert_eq!(anchors.nearest((0.1, 0.1)), Some(Corner::TopStart));
        assert_eq!(anchors.nearest((0.9, 1.2)), Some(Corner::BottomEnd));
        assert_eq!(anchors.nearest((0.5, 0.45)), Some(Corner::Middle));
        assert_eq!(CornerAnchors::default().nearest((0.0, 0.0)), None);

        let moved = CornerAnchors::from_overrides([
            (Corner::TopStart, None, Some(0.4)),
            (Corner::BottomEnd, None, None),
        ]);
        assert_eq!(moved.get(Corner::TopStart), Some((0.0, 0.4)));
        assert_eq!(moved.get(Corner::Middle), None);
        assert_eq!(moved.nearest((0.5, 0.5)), Some(Corner::TopStart));
    }

    #[test]
    fn relative_part_box() {
        let core = Rect::new(10, 10, 20, 10);
        let part = Rect::new(14, 24, 4, 2);
        let rel = PartBox::relative(&core, &part);
        assert_eq!(
            rel,
            PartBox {
                x: 0.3,
                y: 0.75,
                w: 0.2,
                h: 0.1
            }
        );
        let template = PartBox {
            x: 0.4,
            y: 0.7,
            w: 0.25,
            h: 0.0,
        };
        assert!(rel.similar(&template, 0.2));
        assert!(!rel.similar(&template, 0.1));
    }

    #[test]
    fn font_info_validation() {
        let embedder = Embedder::raw(2);
        assert!(FontInfo::new(embedder.clone(), vec![prototype('\u{13000}', 4)], AnchorTable::new()).is_ok());

        assert_eq!(
            FontInfo::new(embedder.clone(), Vec::new(), AnchorTable::new()).unwrap_err(),
            HieroError::InvalidModel("no prototypes".to_string())
        );

        let err = FontInfo::new(embedder.clone(), vec![prototype('\u{13000}', 3)], AnchorTable::new())
            .unwrap_err();
        assert!(matches!(err, HieroError::DimensionMismatch { expected: 4, actual: 3, .. }));

        let mut bad_aspect = prototype('\u{13000}', 4);
        bad_aspect.core.aspect = 0.0;
        assert!(FontInfo::new(embedder.clone(), vec![bad_aspect], AnchorTable::new()).is_err());

        let mut parts_only = prototype('\u{13000}', 4);
        parts_only.parts.push(PartBox {
            x: 0.5,
            y: 1.2,
            w: 0.2,
            h: 0.2,
        });
        assert!(FontInfo::new(embedder, vec![parts_only], AnchorTable::new()).is_err());
    }

    #[test]
    fn font_info_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FontInfo>();
    }
}
