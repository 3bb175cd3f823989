//! Segmentation of images into connected ink components.

use std::collections::HashSet;

use image::GrayImage;

use crate::geometry::Rect;
use crate::segment::{InkPixel, Segment};

/// Default ink threshold for sign transcription.
pub const INK_THRESHOLD: u8 = 128;

/// Smallest bounding-box area of a component worth classifying.
pub const MIN_SEGMENT_AREA: u64 = 6;

/// Default minimum fraction of ink pixels within a component's bounding box.
pub const MIN_INK_DENSITY: f64 = 0.01;

const FOUR_NEIGHBORS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

const EIGHT_NEIGHBORS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Pixel connectivity used when flooding ink regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Connectivity {
    /// Horizontal and vertical neighbours only ("strict").
    Four,
    /// Diagonal neighbours too.
    #[default]
    Eight,
}

impl Connectivity {
    fn offsets(self) -> &'static [(i64, i64)] {
        match self {
            Connectivity::Four => &FOUR_NEIGHBORS,
            Connectivity::Eight => &EIGHT_NEIGHBORS,
        }
    }
}

/// Options for connected-component segmentation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentOptions {
    /// A pixel is ink iff its intensity is at most this value.
    pub threshold: u8,
    /// Neighbourhood used for flooding.
    pub connectivity: Connectivity,
    /// Drop components whose bounding-box area is below this.
    pub min_area: Option<u64>,
    /// Drop components with fewer than `min_ink_density × area` ink pixels.
    pub min_ink_density: Option<f64>,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            threshold: INK_THRESHOLD,
            connectivity: Connectivity::Eight,
            min_area: None,
            min_ink_density: None,
        }
    }
}

/// Is a pixel of this intensity ink?
pub fn is_ink(value: u8, threshold: u8) -> bool {
    value <= threshold
}

fn neighbor(x: u32, y: u32, (dx, dy): (i64, i64), width: u32, height: u32) -> Option<(u32, u32)> {
    let nx = i64::from(x) + dx;
    let ny = i64::from(y) + dy;
    if nx < 0 || ny < 0 || nx >= i64::from(width) || ny >= i64::from(height) {
        return None;
    }
    Some((nx as u32, ny as u32))
}

/// Find all maximal connected ink regions of `image`.
///
/// Seeds are visited column by column (x outer, y inner), which fixes the
/// order of the returned components.
pub fn find_components(
    image: &GrayImage,
    threshold: u8,
    connectivity: Connectivity,
) -> Vec<Vec<InkPixel>> {
    let (width, height) = image.dimensions();
    let mut visited = vec![false; width as usize * height as usize];
    let index = |x: u32, y: u32| y as usize * width as usize + x as usize;
    let mut components = Vec::new();

    for x in 0..width {
        for y in 0..height {
            if visited[index(x, y)] || !is_ink(image.get_pixel(x, y).0[0], threshold) {
                continue;
            }
            visited[index(x, y)] = true;
            let mut component = Vec::new();
            let mut stack = vec![(x, y)];
            while let Some((cx, cy)) = stack.pop() {
                component.push(InkPixel {
                    x: cx,
                    y: cy,
                    value: image.get_pixel(cx, cy).0[0],
                });
                for &offset in connectivity.offsets() {
                    let Some((nx, ny)) = neighbor(cx, cy, offset, width, height) else {
                        continue;
                    };
                    if !visited[index(nx, ny)] && is_ink(image.get_pixel(nx, ny).0[0], threshold) {
                        visited[index(nx, ny)] = true;
                        stack.push((nx, ny));
                    }
                }
            }
            components.push(component);
        }
    }

    components
}

/// Split an image into one [`Segment`] per connected ink component,
/// applying the area and ink-density filters of `options`.
pub fn segment_image(image: &GrayImage, options: &SegmentOptions) -> Vec<Segment> {
    let segments: Vec<Segment> = find_components(image, options.threshold, options.connectivity)
        .iter()
        .filter_map(|c| Segment::from_pixels(c))
        .filter(|s| options.min_area.is_none_or(|min| s.area() >= min))
        .collect();

    let Some(density) = options.min_ink_density else {
        return segments;
    };
    let before = segments.len();
    let kept: Vec<Segment> = segments
        .into_iter()
        .filter(|s| s.ink_count(options.threshold) as f64 >= density * s.area() as f64)
        .collect();
    if kept.len() < before {
        tracing::debug!(
            before,
            after = kept.len(),
            "dropped sparse components below ink density {density}"
        );
    }
    kept
}

/// Grow `pixels` over the whole page from the ink lying on the border of
/// `rect`, following 8-connected ink outward.
pub fn expand_component(page: &GrayImage, rect: &Rect, pixels: &mut Vec<InkPixel>, threshold: u8) {
    let (width, height) = page.dimensions();
    let mut seen: HashSet<(u32, u32)> = pixels.iter().map(|p| (p.x, p.y)).collect();
    let on_border = |p: &InkPixel| {
        p.x == rect.x || p.y == rect.y || p.x + 1 == rect.right() || p.y + 1 == rect.bottom()
    };
    let mut stack: Vec<(u32, u32)> = pixels
        .iter()
        .filter(|p| on_border(p))
        .map(|p| (p.x, p.y))
        .collect();

    while let Some((x, y)) = stack.pop() {
        for &offset in &EIGHT_NEIGHBORS {
            let Some((nx, ny)) = neighbor(x, y, offset, width, height) else {
                continue;
            };
            let value = page.get_pixel(nx, ny).0[0];
            if is_ink(value, threshold) && seen.insert((nx, ny)) {
                pixels.push(InkPixel {
                    x: nx,
                    y: ny,
                    value,
                });
                stack.push((nx, ny));
            }
        }
    }
}
