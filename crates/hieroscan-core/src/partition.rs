//! Splitting a set of boxes into runs along one axis.
//!
//! Boxes whose extents overlap along the partition axis by more than a
//! fraction of the narrower extent end up in the same group. Groups are
//! then rejoined when one sticks into the other across the perpendicular
//! axis, which repairs splits caused by a single outlier.

use crate::geometry::Rect;

/// Default divisor for the minimum overlap between a box and a group.
pub const OVERLAP_RATIO: f64 = 6.0;

/// Anything with a bounding box on the page.
pub trait Bounded {
    fn bounds(&self) -> Rect;
}

impl Bounded for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

impl Bounded for crate::classify::ClassifiedSegment {
    fn bounds(&self) -> Rect {
        self.rect()
    }
}

/// Page axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Start and length of `rect` along this axis.
    pub fn span(self, rect: &Rect) -> (u32, u32) {
        match self {
            Axis::X => (rect.x, rect.width),
            Axis::Y => (rect.y, rect.height),
        }
    }

    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// Groups of boxes side by side, ordered left to right.
pub fn partition_horizontal<T: Bounded + Clone>(items: &[T], overlap_ratio: f64) -> Vec<Vec<T>> {
    partition(items, Axis::X, overlap_ratio)
}

/// Groups of boxes stacked vertically, ordered top to bottom.
pub fn partition_vertical<T: Bounded + Clone>(items: &[T], overlap_ratio: f64) -> Vec<Vec<T>> {
    partition(items, Axis::Y, overlap_ratio)
}

/// Split `items` into runs along `axis`, then rejoin across the other axis.
pub fn partition<T: Bounded + Clone>(items: &[T], axis: Axis, overlap_ratio: f64) -> Vec<Vec<T>> {
    let mut order: Vec<&T> = items.iter().collect();
    order.sort_by_key(|item| axis.span(&item.bounds()).0);

    let mut taken = vec![false; order.len()];
    let mut groups = Vec::new();
    for first in 0..order.len() {
        if taken[first] {
            continue;
        }
        taken[first] = true;
        let (lo, len) = axis.span(&order[first].bounds());
        let mut hi = lo + len;
        let mut group = vec![order[first].clone()];

        loop {
            let old_hi = hi;
            for (i, item) in order.iter().enumerate() {
                if taken[i] {
                    continue;
                }
                let (start, extent) = axis.span(&item.bounds());
                let min_overlap = f64::from((hi - lo).min(extent)) / overlap_ratio;
                if f64::from(start) <= f64::from(hi) - min_overlap {
                    taken[i] = true;
                    hi = hi.max(start + extent);
                    group.push((*item).clone());
                }
            }
            if hi == old_hi {
                break;
            }
        }
        groups.push(group);
    }

    rejoin(groups, axis.other())
}

/// Merge neighbouring groups when one reaches past the other's centre
/// line along `axis` and the reaching-into group has several members.
pub fn rejoin<T: Bounded>(mut groups: Vec<Vec<T>>, axis: Axis) -> Vec<Vec<T>> {
    let mut i = 0;
    while i + 1 < groups.len() {
        if should_rejoin(&groups[i], &groups[i + 1], axis) {
            let next = groups.remove(i + 1);
            groups[i].extend(next);
        } else {
            i += 1;
        }
    }
    groups
}

fn should_rejoin<T: Bounded>(a: &[T], b: &[T], axis: Axis) -> bool {
    let (Some(rect_a), Some(rect_b)) = (group_bounds(a), group_bounds(b)) else {
        return false;
    };
    let (a_lo, a_len) = axis.span(&rect_a);
    let (b_lo, b_len) = axis.span(&rect_b);
    let (a_lo, a_end) = (f64::from(a_lo), f64::from(a_lo + a_len));
    let (b_lo, b_end) = (f64::from(b_lo), f64::from(b_lo + b_len));
    let mid_a = a_lo + f64::from(a_len) / 2.0;
    let mid_b = b_lo + f64::from(b_len) / 2.0;

    (a_end < mid_b && b_lo < a_end && b.len() > 1)
        || (mid_b < a_lo && a_lo < b_end && b.len() > 1)
        || (b_end < mid_a && a_lo < b_end && a.len() > 1)
        || (mid_a < b_lo && b_lo < a_end && a.len() > 1)
}

/// Bounding box of a group.
pub fn group_bounds<T: Bounded>(group: &[T]) -> Option<Rect> {
    group.iter().map(Bounded::bounds).reduce(|a, b| a.union(&b))
}
