/// Axis-aligned rectangle in page pixel coordinates (top-left origin).
///
/// - `x`: left edge (inclusive)
/// - `y`: top edge (inclusive)
/// - `width`, `height`: extent in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Midpoint of the rectangle.
    pub fn center(&self) -> (f64, f64) {
        (
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Right and bottom edges widened to `u64`, so that rectangles read
    /// from user input cannot overflow.
    fn far_edges(&self) -> (u64, u64) {
        (
            u64::from(self.x) + u64::from(self.width),
            u64::from(self.y) + u64::from(self.height),
        )
    }

    /// Is the point `(x, y)` inside this rectangle?
    pub fn contains(&self, x: u32, y: u32) -> bool {
        let (right, bottom) = self.far_edges();
        self.x <= x && u64::from(x) < right && self.y <= y && u64::from(y) < bottom
    }

    /// Is `other` entirely inside this rectangle?
    pub fn contains_rect(&self, other: &Rect) -> bool {
        let (right, bottom) = self.far_edges();
        let (other_right, other_bottom) = other.far_edges();
        self.x <= other.x && self.y <= other.y && other_right <= right && other_bottom <= bottom
    }

    /// Do the interiors of the two rectangles intersect?
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Compute the union of two rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Union of all rectangles, or `None` if there are none.
    pub fn bounding<'a, I>(rects: I) -> Option<Rect>
    where
        I: IntoIterator<Item = &'a Rect>,
    {
        rects
            .into_iter()
            .copied()
            .reduce(|acc, r| acc.union(&r))
    }
}
