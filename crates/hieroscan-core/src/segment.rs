//! Cropped monochrome regions of a page.
//!
//! A [`Segment`] owns a grayscale pixel buffer (0 = black, 255 = white)
//! together with the page position of its top-left corner. Buffers are
//! never modified after construction; merging produces a new segment.

use image::{GrayImage, Luma, imageops};

use crate::geometry::Rect;
use crate::segmentation::{expand_component, is_ink};

/// Intensity used for background pixels.
pub const WHITE: u8 = 255;

/// A single ink pixel in page coordinates, keeping its original intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InkPixel {
    pub x: u32,
    pub y: u32,
    pub value: u8,
}

/// A cropped grayscale region together with its page offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    image: GrayImage,
    x: u32,
    y: u32,
}

impl Segment {
    /// Create a segment from a buffer placed at `(x, y)` on the page.
    ///
    /// Returns `None` if the buffer has zero width or height.
    pub fn new(image: GrayImage, x: u32, y: u32) -> Option<Self> {
        if image.width() == 0 || image.height() == 0 {
            return None;
        }
        Some(Self { image, x, y })
    }

    /// Build the tightest segment containing `pixels`, with a white
    /// background everywhere else. Returns `None` for an empty pixel set.
    pub fn from_pixels(pixels: &[InkPixel]) -> Option<Self> {
        let x_min = pixels.iter().map(|p| p.x).min()?;
        let x_max = pixels.iter().map(|p| p.x).max()?;
        let y_min = pixels.iter().map(|p| p.y).min()?;
        let y_max = pixels.iter().map(|p| p.y).max()?;
        let mut image = GrayImage::from_pixel(x_max - x_min + 1, y_max - y_min + 1, Luma([WHITE]));
        for p in pixels {
            image.put_pixel(p.x - x_min, p.y - y_min, Luma([p.value]));
        }
        Self::new(image, x_min, y_min)
    }

    /// Cut the area of `rect` out of `page`.
    ///
    /// Returns `None` if the rectangle is empty or not inside the page.
    pub fn from_page_rect(page: &GrayImage, rect: Rect) -> Option<Self> {
        let page_rect = Rect::new(0, 0, page.width(), page.height());
        if !page_rect.contains_rect(&rect) {
            return None;
        }
        let image = imageops::crop_imm(page, rect.x, rect.y, rect.width, rect.height).to_image();
        Self::new(image, rect.x, rect.y)
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Bounding box on the page.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width(), self.height())
    }

    /// Area of the bounding box.
    pub fn area(&self) -> u64 {
        self.rect().area()
    }

    /// The same pixels shifted by `(dx, dy)` on the page.
    pub fn translate(&self, dx: u32, dy: u32) -> Segment {
        Segment {
            image: self.image.clone(),
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Do the bounding boxes of the two segments overlap?
    pub fn overlaps(&self, other: &Segment) -> bool {
        self.rect().overlaps(&other.rect())
    }

    /// Combine two segments over the union of their bounding boxes, keeping
    /// the darker pixel wherever both have one.
    pub fn merge(a: &Segment, b: &Segment) -> Segment {
        let rect = a.rect().union(&b.rect());
        let mut image = GrayImage::from_pixel(rect.width, rect.height, Luma([WHITE]));
        for segment in [a, b] {
            let dx = segment.x - rect.x;
            let dy = segment.y - rect.y;
            for (x, y, p) in segment.image.enumerate_pixels() {
                let target = image.get_pixel_mut(x + dx, y + dy);
                target.0[0] = target.0[0].min(p.0[0]);
            }
        }
        Segment {
            image,
            x: rect.x,
            y: rect.y,
        }
    }

    /// Merge a whole list of segments. Returns `None` for an empty list.
    pub fn merge_all(segments: &[Segment]) -> Option<Segment> {
        let (first, rest) = segments.split_first()?;
        Some(
            rest.iter()
                .fold(first.clone(), |merged, s| Segment::merge(&merged, s)),
        )
    }

    /// Merge only those segments whose area is at least `min_area`,
    /// ignoring specks. Returns `None` if no segment is large enough.
    pub fn merge_large(segments: &[Segment], min_area: u64) -> Option<Segment> {
        segments
            .iter()
            .filter(|s| s.area() >= min_area)
            .fold(None, |merged: Option<Segment>, s| match merged {
                None => Some(s.clone()),
                Some(m) => Some(Segment::merge(&m, s)),
            })
    }

    /// All ink pixels of this segment, in page coordinates.
    pub fn ink_pixels(&self, threshold: u8) -> Vec<InkPixel> {
        let mut pixels = Vec::new();
        for x in 0..self.width() {
            for y in 0..self.height() {
                let value = self.image.get_pixel(x, y).0[0];
                if is_ink(value, threshold) {
                    pixels.push(InkPixel {
                        x: self.x + x,
                        y: self.y + y,
                        value,
                    });
                }
            }
        }
        pixels
    }

    /// Number of ink pixels in the buffer.
    pub fn ink_count(&self, threshold: u8) -> usize {
        self.image
            .pixels()
            .filter(|p| is_ink(p.0[0], threshold))
            .count()
    }

    /// The area of the page under this segment's bounding box.
    pub fn crop_from_page(&self, page: &GrayImage) -> GrayImage {
        imageops::crop_imm(page, self.x, self.y, self.width(), self.height()).to_image()
    }

    /// Re-derive the full connected component of this segment from the page.
    ///
    /// Ink that touches the segment's bounding box edges is followed outward
    /// over the whole page, recovering parts of a sign that an earlier crop
    /// clipped off. A segment without any ink is returned unchanged.
    pub fn recreate_from_page(&self, page: &GrayImage, threshold: u8) -> Segment {
        let mut pixels = self.ink_pixels(threshold);
        expand_component(page, &self.rect(), &mut pixels, threshold);
        Segment::from_pixels(&pixels).unwrap_or_else(|| self.clone())
    }
}
