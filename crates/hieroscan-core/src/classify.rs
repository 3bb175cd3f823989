//! Nearest-neighbour classification of segments against the prototype
//! database, including signs made of several detached components.

use std::cmp::Reverse;

use crate::aspect::AspectGate;
use crate::controls::Z1;
use crate::embedding::squared_distance;
use crate::font::{FontInfo, PartBox};
use crate::geometry::Rect;
use crate::segment::Segment;

/// Default number of candidates kept per segment.
pub const BEAM_WIDTH: usize = 10;

/// Default tolerance when matching detached parts against a template.
pub const PART_EPSILON: f64 = 0.2;

/// A prototype and its distance to an unknown shape.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    /// Index into [`FontInfo::prototypes`].
    pub index: usize,
    pub distance: f64,
}

/// Classification state of a segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    /// Ranked candidates, best first.
    Candidates(Vec<Candidate>),
    /// Final sign.
    Resolved(char),
    /// No prototype could be assigned.
    Unresolved,
}

/// A segment together with what it has been recognized as.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedSegment {
    pub segment: Segment,
    pub label: Label,
}

impl ClassifiedSegment {
    pub fn new(segment: Segment, label: Label) -> Self {
        Self { segment, label }
    }

    /// The resolved sign, if any.
    pub fn sign(&self) -> Option<char> {
        match self.label {
            Label::Resolved(sign) => Some(sign),
            _ => None,
        }
    }

    pub fn rect(&self) -> Rect {
        self.segment.rect()
    }

    pub fn area(&self) -> u64 {
        self.segment.area()
    }
}

/// What to do when no prototype passes the aspect gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AspectFallback {
    /// Use the single nearest prototype regardless of aspect ratio.
    #[default]
    NearestUnfiltered,
    /// Leave the segment unresolved.
    Reject,
}

/// Options for classification.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassifyOptions {
    /// Number of candidates kept per segment.
    pub beam_width: usize,
    pub aspect_gate: AspectGate,
    pub fallback: AspectFallback,
    /// Tolerance on each relative coordinate when matching detached parts.
    pub part_epsilon: f64,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            beam_width: BEAM_WIDTH,
            aspect_gate: AspectGate::default(),
            fallback: AspectFallback::default(),
            part_epsilon: PART_EPSILON,
        }
    }
}

/// Rank prototypes by distance between the segment's embedding and their
/// core embeddings, considering only prototypes of compatible aspect.
pub fn classify_core(segment: &Segment, font: &FontInfo, options: &ClassifyOptions) -> Vec<Candidate> {
    let embedding = font.embed(segment.image());
    let aspect = segment.rect().aspect();

    let all: Vec<Candidate> = font
        .prototypes()
        .iter()
        .enumerate()
        .map(|(index, p)| Candidate {
            index,
            distance: squared_distance(&embedding, &p.core.embedding),
        })
        .collect();

    let mut gated: Vec<Candidate> = all
        .iter()
        .filter(|c| {
            options
                .aspect_gate
                .similar(aspect, font.prototypes()[c.index].core.aspect)
        })
        .copied()
        .collect();

    if gated.is_empty() {
        return match options.fallback {
            AspectFallback::NearestUnfiltered => {
                let nearest = all
                    .into_iter()
                    .min_by(|a, b| a.distance.total_cmp(&b.distance));
                tracing::warn!(
                    x = segment.x(),
                    y = segment.y(),
                    aspect,
                    "no prototype of similar aspect, using nearest unfiltered"
                );
                nearest.into_iter().collect()
            }
            AspectFallback::Reject => {
                tracing::debug!(
                    x = segment.x(),
                    y = segment.y(),
                    aspect,
                    "no prototype of similar aspect"
                );
                Vec::new()
            }
        };
    }

    gated.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    gated.truncate(options.beam_width.max(1));
    gated
}

/// Outcome of resolving one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub sign: char,
    /// The segment merged with the detached parts that were found.
    pub segment: Segment,
    /// Indices of the other segments absorbed as parts.
    pub consumed: Vec<usize>,
    pub distance: f64,
}

/// Pick the best candidate for the segment at `index`.
///
/// Candidates with a parts template look for matching segments among the
/// later, not yet `consumed` ones and are scored on the merged shape
/// against their full embedding. Returns `None` when the segment has no
/// candidates.
pub fn resolve_composite(
    segments: &[ClassifiedSegment],
    index: usize,
    consumed: &[bool],
    font: &FontInfo,
    options: &ClassifyOptions,
) -> Option<Resolution> {
    let current = segments.get(index)?;
    let Label::Candidates(candidates) = &current.label else {
        return None;
    };
    let core_rect = current.rect();

    let mut best: Option<Resolution> = None;
    for candidate in candidates {
        let Some(prototype) = font.prototype(candidate.index) else {
            continue;
        };
        let resolution = match (&prototype.full, prototype.parts.is_empty()) {
            (Some(full), false) => {
                let mut merged = current.segment.clone();
                let mut parts = Vec::new();
                for (j, other) in segments.iter().enumerate().skip(index + 1) {
                    if consumed.get(j).copied().unwrap_or(false) {
                        continue;
                    }
                    let location = PartBox::relative(&core_rect, &other.rect());
                    if prototype
                        .parts
                        .iter()
                        .any(|p| location.similar(p, options.part_epsilon))
                    {
                        merged = Segment::merge(&merged, &other.segment);
                        parts.push(j);
                    }
                }
                let distance = squared_distance(&font.embed(merged.image()), &full.embedding);
                Resolution {
                    sign: prototype.sign,
                    segment: merged,
                    consumed: parts,
                    distance,
                }
            }
            _ => Resolution {
                sign: prototype.sign,
                segment: current.segment.clone(),
                consumed: Vec::new(),
                distance: candidate.distance,
            },
        };
        if best
            .as_ref()
            .is_none_or(|b| resolution.distance < b.distance)
        {
            best = Some(resolution);
        }
    }
    best
}

/// Resolve every segment, largest first, so that each segment ends up in
/// exactly one sign. `segments` must be sorted by decreasing area.
pub fn resolve_composites(
    segments: Vec<ClassifiedSegment>,
    font: &FontInfo,
    options: &ClassifyOptions,
) -> Vec<ClassifiedSegment> {
    let mut consumed = vec![false; segments.len()];
    let mut resolved = Vec::with_capacity(segments.len());
    for i in 0..segments.len() {
        if consumed[i] {
            continue;
        }
        consumed[i] = true;
        match resolve_composite(&segments, i, &consumed, font, options) {
            Some(resolution) => {
                if !resolution.consumed.is_empty() {
                    tracing::debug!(
                        sign = %resolution.sign.escape_unicode(),
                        parts = resolution.consumed.len(),
                        "merged detached parts"
                    );
                }
                for &j in &resolution.consumed {
                    consumed[j] = true;
                }
                resolved.push(ClassifiedSegment::new(
                    resolution.segment,
                    Label::Resolved(resolution.sign),
                ));
            }
            None => {
                resolved.push(ClassifiedSegment::new(
                    segments[i].segment.clone(),
                    Label::Unresolved,
                ));
            }
        }
    }
    resolved
}

/// Reassign thin strokes to Z1.
///
/// A shape narrower than a ninth of the widest segment, lower than a third
/// of the tallest one, and with aspect ratio below 0.3 is taken to be a
/// stroke, whatever the classifier said. Unresolved segments stay
/// unresolved.
pub fn correct_strokes(signs: &mut [ClassifiedSegment], widest: u32, tallest: u32) {
    for sign in signs.iter_mut() {
        if sign.label == Label::Unresolved {
            continue;
        }
        let rect = sign.rect();
        let w = f64::from(rect.width);
        let h = f64::from(rect.height);
        if w < f64::from(widest) / 9.0 && h < f64::from(tallest) / 3.0 && w / h < 0.3 {
            sign.label = Label::Resolved(Z1);
        }
    }
}

/// Classify raw segments: rank, resolve composites and correct strokes.
pub fn classify_segments(
    mut segments: Vec<Segment>,
    font: &FontInfo,
    options: &ClassifyOptions,
) -> Vec<ClassifiedSegment> {
    let widest = segments.iter().map(Segment::width).max().unwrap_or(0);
    let tallest = segments.iter().map(Segment::height).max().unwrap_or(0);
    segments.sort_by_key(|s| Reverse(s.area()));

    let ranked: Vec<ClassifiedSegment> = segments
        .into_iter()
        .map(|segment| {
            let candidates = classify_core(&segment, font, options);
            ClassifiedSegment::new(segment, Label::Candidates(candidates))
        })
        .collect();

    let mut signs = resolve_composites(ranked, font, options);
    correct_strokes(&mut signs, widest, tallest);

    let unresolved = signs.iter().filter(|s| s.label == Label::Unresolved).count();
    if unresolved > 0 {
        tracing::warn!(unresolved, "segments left without a sign");
    }
    signs
}
