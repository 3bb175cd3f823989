//! Reconstruction of the block structure of an inscription from the
//! bounding boxes of its recognized signs.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::classify::ClassifiedSegment;
use crate::controls::{D12, FULL_LOST, N5, TALL_LOST, WIDE_LOST, Z4, Z5, Z5A, Z13, Z14};
use crate::font::{AnchorTable, Corner};
use crate::geometry::Rect;
use crate::partition::{Bounded, OVERLAP_RATIO, group_bounds, partition_horizontal, partition_vertical};
use crate::structure::Structure;

/// A recognized sign at its place on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedSign {
    pub sign: char,
    pub rect: Rect,
}

impl PlacedSign {
    pub fn new(sign: char, rect: Rect) -> Self {
        Self { sign, rect }
    }

    /// The sign of a resolved segment; `None` if it is unresolved.
    pub fn from_classified(classified: &ClassifiedSegment) -> Option<Self> {
        classified
            .sign()
            .map(|sign| Self::new(sign, classified.rect()))
    }

    pub fn area(&self) -> u64 {
        self.rect.area()
    }
}

impl Bounded for PlacedSign {
    fn bounds(&self) -> Rect {
        self.rect
    }
}

/// Dominant reading direction of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    Horizontal,
    Vertical,
}

impl Direction {
    /// Vertical for regions taller than wide, horizontal otherwise.
    pub fn infer(width: u32, height: u32) -> Direction {
        if height > width {
            Direction::Vertical
        } else {
            Direction::Horizontal
        }
    }
}

/// When a cluster of signs is read as a damaged area rather than as text.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamagePolicy {
    /// Hatching signs that indicate damage when they dominate a cluster.
    pub fill_signs: Vec<char>,
    /// Smallest cluster that can be damage.
    pub min_members: usize,
    /// Smallest number of hatching signs in such a cluster.
    pub min_fill_signs: usize,
    /// A damaged area narrower than `tall_ratio × height` is tall, and one
    /// lower than `tall_ratio × width` is wide.
    pub tall_ratio: f64,
}

impl Default for DamagePolicy {
    fn default() -> Self {
        Self {
            fill_signs: vec![Z4, Z5, Z5A, Z14, FULL_LOST],
            min_members: 4,
            min_fill_signs: 4,
            tall_ratio: 0.8,
        }
    }
}

impl DamagePolicy {
    pub fn is_damage(&self, group: &[PlacedSign]) -> bool {
        group.len() >= self.min_members
            && group
                .iter()
                .filter(|s| self.fill_signs.contains(&s.sign))
                .count()
                >= self.min_fill_signs
    }

    /// Placeholder sign for a damaged area with bounding box `rect`.
    pub fn placeholder(&self, rect: &Rect) -> char {
        let w = f64::from(rect.width);
        let h = f64::from(rect.height);
        if w < self.tall_ratio * h {
            TALL_LOST
        } else if h < self.tall_ratio * w {
            WIDE_LOST
        } else {
            FULL_LOST
        }
    }
}

/// Options for layout reconstruction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutOptions {
    /// Divisor for the minimum overlap when partitioning.
    pub overlap_ratio: f64,
    /// Signs smaller than this fraction of a core's area are not inserted.
    pub min_insertion_ratio: f64,
    pub damage: DamagePolicy,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            overlap_ratio: OVERLAP_RATIO,
            min_insertion_ratio: 0.01,
            damage: DamagePolicy::default(),
        }
    }
}

/// Builds [`Structure`] trees from groups of placed signs.
///
/// Grouping alternates between horizontal and vertical partitions at each
/// level. A group that no longer splits becomes a single core sign with
/// the remaining members inserted at its corners.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    anchors: &'a AnchorTable,
    options: &'a LayoutOptions,
}

impl<'a> Layout<'a> {
    pub fn new(anchors: &'a AnchorTable, options: &'a LayoutOptions) -> Self {
        Self { anchors, options }
    }

    /// Structure of a group with no preferred direction: horizontal split
    /// first, then vertical. Returns `None` for an empty group.
    pub fn top_group_to_structure(&self, group: &[PlacedSign]) -> Option<Structure> {
        let groups = partition_horizontal(group, self.options.overlap_ratio);
        if groups.len() > 1 {
            return Some(Structure::Horizontal(
                groups
                    .iter()
                    .filter_map(|g| self.horizontal_subgroup_to_structure(g))
                    .collect(),
            ));
        }
        let groups = partition_vertical(group, self.options.overlap_ratio);
        if groups.len() > 1 {
            return Some(Structure::Vertical(
                groups
                    .iter()
                    .filter_map(|g| self.vertical_subgroup_to_structure(g))
                    .collect(),
            ));
        }
        self.basic_to_structure(group)
    }

    /// Structure of one member of a horizontal split.
    pub fn horizontal_subgroup_to_structure(&self, group: &[PlacedSign]) -> Option<Structure> {
        let groups = partition_vertical(group, self.options.overlap_ratio);
        if groups.len() > 1 {
            return Some(Structure::Vertical(
                groups
                    .iter()
                    .filter_map(|g| self.vertical_subgroup_to_structure(g))
                    .collect(),
            ));
        }
        self.basic_to_structure(group)
    }

    /// Structure of one member of a vertical split.
    pub fn vertical_subgroup_to_structure(&self, group: &[PlacedSign]) -> Option<Structure> {
        let groups = partition_horizontal(group, self.options.overlap_ratio);
        if groups.len() > 1 {
            return Some(Structure::Horizontal(
                groups
                    .iter()
                    .filter_map(|g| self.horizontal_subgroup_to_structure(g))
                    .collect(),
            ));
        }
        self.basic_to_structure(group)
    }

    /// A group that does not split: the largest sign with the others
    /// inserted at its corners.
    pub fn basic_to_structure(&self, group: &[PlacedSign]) -> Option<Structure> {
        let mut members = group.to_vec();
        members.sort_by_key(|s| Reverse(s.area()));
        let (core, rest) = members.split_first()?;

        let damage = &self.options.damage;
        if damage.is_damage(&members) {
            let rect = group_bounds(&members)?;
            return Some(Structure::sign(damage.placeholder(&rect)));
        }
        if !rest.is_empty() {
            match core.sign {
                Z5A => return Some(Structure::sign(Z4)),
                D12 | Z13 => return Some(Structure::sign(N5)),
                _ => {}
            }
        }

        let Some(anchors) = self.anchors.get(&core.sign) else {
            if !rest.is_empty() {
                tracing::debug!(
                    core = %core.sign.escape_unicode(),
                    dropped = rest.len(),
                    "core sign takes no insertions"
                );
            }
            return Some(Structure::sign(core.sign));
        };

        let min_area = core.area() as f64 * self.options.min_insertion_ratio;
        let mut by_corner: BTreeMap<Corner, Vec<PlacedSign>> = BTreeMap::new();
        for member in rest {
            if (member.area() as f64) < min_area {
                continue;
            }
            let Some(corner) = anchors.nearest(relative_position(&core.rect, &member.rect)) else {
                continue;
            };
            by_corner.entry(corner).or_default().push(*member);
        }

        let corners = by_corner
            .into_iter()
            .filter_map(|(corner, signs)| {
                self.top_group_to_structure(&signs)
                    .map(|structure| (corner, structure))
            })
            .collect();
        Some(Structure::Basic {
            sign: core.sign,
            corners,
        })
    }

    /// Normalized structures of the top-level groups in reading order.
    pub fn structures(&self, signs: &[PlacedSign], direction: Direction) -> Vec<Structure> {
        match direction {
            Direction::Horizontal => partition_horizontal(signs, self.options.overlap_ratio)
                .iter()
                .filter_map(|g| self.horizontal_subgroup_to_structure(g))
                .map(|s| s.normalize())
                .collect(),
            Direction::Vertical => partition_vertical(signs, self.options.overlap_ratio)
                .iter()
                .filter_map(|g| self.vertical_subgroup_to_structure(g))
                .map(|s| s.normalize())
                .collect(),
        }
    }

    /// Unicode encoding of the signs, read in `direction`.
    pub fn encode(&self, signs: &[PlacedSign], direction: Direction) -> String {
        self.structures(signs, direction)
            .iter()
            .map(Structure::to_unicode)
            .collect()
    }
}

/// Midpoint of `member` relative to `core`, in units of the core's width
/// and height.
fn relative_position(core: &Rect, member: &Rect) -> (f64, f64) {
    let (x_mid, y_mid) = member.center();
    (
        (x_mid - f64::from(core.x)) / f64::from(core.width),
        (y_mid - f64::from(core.y)) / f64::from(core.height),
    )
}

/// Encode placed signs as Unicode with format controls.
pub fn encode_signs(
    signs: &[PlacedSign],
    direction: Direction,
    anchors: &AnchorTable,
    options: &LayoutOptions,
) -> String {
    Layout::new(anchors, options).encode(signs, direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{
        BEGIN_ENCL, CART_CLOSE, CART_OPEN, END_ENCL, HOR, N35, N35A, TS, V10, VER,
    };
    use crate::font::CornerAnchors;

    const A1: char = '\u{13000}';
    const G1: char = '\u{1313F}';

    fn placed(sign: char, x: u32, y: u32, w: u32, h: u32) -> PlacedSign {
        PlacedSign::new(sign, Rect::new(x, y, w, h))
    }

    fn anchors_for(signs: &[char]) -> AnchorTable {
        signs
            .iter()
            .map(|s| (*s, CornerAnchors::with_defaults()))
            .collect()
    }

    fn s(chars: &[char]) -> String {
        chars.iter().collect()
    }

    #[test]
    fn two_by_two_grid() {
        let signs = [
            placed(A1, 10, 10, 20, 20),
            placed(A1, 40, 10, 20, 20),
            placed(A1, 10, 40, 20, 20),
            placed(A1, 40, 40, 20, 20),
        ];
        let encoding = encode_signs(
            &signs,
            Direction::Horizontal,
            &AnchorTable::new(),
            &LayoutOptions::default(),
        );
        assert_eq!(encoding, s(&[A1, VER, A1, A1, VER, A1]));
    }

    #[test]
    fn vertical_reading_splits_rows_first() {
        let signs = [
            placed(A1, 10, 10, 20, 20),
            placed(G1, 40, 10, 20, 20),
            placed(A1, 10, 40, 20, 20),
            placed(G1, 40, 40, 20, 20),
        ];
        let encoding = encode_signs(
            &signs,
            Direction::Vertical,
            &AnchorTable::new(),
            &LayoutOptions::default(),
        );
        assert_eq!(encoding, s(&[A1, HOR, G1, A1, HOR, G1]));
    }

    #[test]
    fn member_near_top_start_is_inserted_there() {
        let signs = [placed(A1, 0, 0, 40, 40), placed(G1, 2, 2, 8, 8)];
        let anchors = anchors_for(&[A1]);
        let options = LayoutOptions::default();
        let layout = Layout::new(&anchors, &options);
        assert_eq!(
            layout.top_group_to_structure(&signs),
            Some(Structure::Basic {
                sign: A1,
                corners: [(Corner::TopStart, Structure::sign(G1))].into_iter().collect(),
            })
        );
        assert_eq!(layout.encode(&signs, Direction::Horizontal), s(&[A1, TS, G1]));
    }

    #[test]
    fn members_of_cores_without_anchors_are_dropped() {
        let signs = [placed(A1, 0, 0, 40, 40), placed(G1, 2, 2, 8, 8)];
        let encoding = encode_signs(
            &signs,
            Direction::Horizontal,
            &AnchorTable::new(),
            &LayoutOptions::default(),
        );
        assert_eq!(encoding, s(&[A1]));
    }

    #[test]
    fn specks_are_not_inserted() {
        let signs = [placed(A1, 0, 0, 40, 40), placed(G1, 2, 2, 1, 1)];
        let encoding = encode_signs(
            &signs,
            Direction::Horizontal,
            &anchors_for(&[A1]),
            &LayoutOptions::default(),
        );
        assert_eq!(encoding, s(&[A1]));
    }

    #[test]
    fn hatched_cluster_becomes_lost_sign() {
        let square = [
            placed(Z5, 0, 0, 10, 10),
            placed(Z5, 5, 0, 10, 10),
            placed(Z4, 0, 5, 10, 10),
            placed(Z14, 5, 5, 10, 10),
        ];
        let options = LayoutOptions::default();
        let anchors = AnchorTable::new();
        let layout = Layout::new(&anchors, &options);
        assert_eq!(layout.basic_to_structure(&square), Some(Structure::sign(FULL_LOST)));

        let tall = [
            placed(Z5, 0, 0, 10, 30),
            placed(Z5, 2, 0, 10, 30),
            placed(Z5, 0, 5, 10, 30),
            placed(Z5, 2, 5, 10, 30),
        ];
        assert_eq!(layout.basic_to_structure(&tall), Some(Structure::sign(TALL_LOST)));

        let wide = [
            placed(Z5, 0, 0, 30, 10),
            placed(Z5, 0, 2, 30, 10),
            placed(Z5, 5, 0, 30, 10),
            placed(Z5, 5, 2, 30, 10),
        ];
        assert_eq!(layout.basic_to_structure(&wide), Some(Structure::sign(WIDE_LOST)));

        // Three hatchings are not enough.
        let strict = LayoutOptions::default();
        assert!(!strict.damage.is_damage(&square[..3]));
    }

    #[test]
    fn ligature_cores() {
        let options = LayoutOptions::default();
        let anchors = anchors_for(&[Z5A, D12]);
        let layout = Layout::new(&anchors, &options);
        let with_member = |core| [placed(core, 0, 0, 20, 20), placed(A1, 5, 5, 4, 4)];
        assert_eq!(layout.basic_to_structure(&with_member(Z5A)), Some(Structure::sign(Z4)));
        assert_eq!(layout.basic_to_structure(&with_member(D12)), Some(Structure::sign(N5)));
        assert_eq!(layout.basic_to_structure(&with_member(Z13)), Some(Structure::sign(N5)));
        assert_eq!(
            layout.basic_to_structure(&[placed(D12, 0, 0, 20, 20)]),
            Some(Structure::sign(D12))
        );
    }

    #[test]
    fn cartouche_with_middle_insertions() {
        let signs = [
            placed(V10, 0, 0, 100, 30),
            placed(A1, 10, 5, 20, 20),
            placed(G1, 50, 5, 20, 20),
        ];
        let encoding = encode_signs(
            &signs,
            Direction::Horizontal,
            &anchors_for(&[V10]),
            &LayoutOptions::default(),
        );
        assert_eq!(
            encoding,
            s(&[CART_OPEN, BEGIN_ENCL, A1, G1, END_ENCL, CART_CLOSE])
        );
    }

    #[test]
    fn stacked_dividers_fold() {
        let signs = [
            placed(N35, 0, 0, 30, 4),
            placed(N35, 0, 10, 30, 4),
            placed(N35, 0, 20, 30, 4),
        ];
        let encoding = encode_signs(
            &signs,
            Direction::Horizontal,
            &AnchorTable::new(),
            &LayoutOptions::default(),
        );
        assert_eq!(encoding, s(&[N35A]));
    }

    #[test]
    fn empty_input_encodes_to_nothing() {
        let encoding = encode_signs(
            &[],
            Direction::Horizontal,
            &AnchorTable::new(),
            &LayoutOptions::default(),
        );
        assert!(encoding.is_empty());
        let options = LayoutOptions::default();
        let anchors = AnchorTable::new();
        assert_eq!(Layout::new(&anchors, &options).basic_to_structure(&[]), None);
    }

    #[test]
    fn direction_inference() {
        assert_eq!(Direction::infer(100, 30), Direction::Horizontal);
        assert_eq!(Direction::infer(30, 100), Direction::Vertical);
        assert_eq!(Direction::infer(50, 50), Direction::Horizontal);
    }
}
