use crate::{Margin, Padding, Point};

/// A rectangle with a signed origin and non-negative size.
///
/// All constructors and operations clamp `w`/`h` to zero or above; a rect
/// can never hold a negative size.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Horizontal origin.
    pub x: i32,
    /// Vertical origin.
    pub y: i32,
    /// Width, always ≥ 0.
    pub w: i32,
    /// Height, always ≥ 0.
    pub h: i32,
}

impl Rect {
    /// Construct a rectangle, clamping negative sizes to zero.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x,
            y,
            w: w.max(0),
            h: h.max(0),
        }
    }

    /// The zero rectangle at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Does this rect cover no area?
    pub fn is_zero(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Top-left corner.
    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// One past the right edge.
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// One past the bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// The same size placed at the origin.
    pub fn at_origin(&self) -> Self {
        Self::new(0, 0, self.w, self.h)
    }

    /// The same size placed at `pos`.
    pub fn at(&self, pos: Point) -> Self {
        Self::new(pos.x, pos.y, self.w, self.h)
    }

    /// Shift the rectangle by an offset.
    pub fn translate(&self, offset: Point) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    /// Does the point fall within the rect? Edges are half-open: a rect
    /// contains `[x, x + w) × [y, y + h)`.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Intersect two rectangles, or `None` if they do not overlap.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(Self::new(x, y, right - x, bottom - y))
    }

    /// Shrink by a margin: the origin moves in by the left/top insets and
    /// the size loses both inset sums.
    pub fn shrink(&self, m: &Margin) -> Self {
        Self::new(
            self.x + m.left,
            self.y + m.top,
            self.w - m.horizontal(),
            self.h - m.vertical(),
        )
    }

    /// The interior left over after padding is reserved.
    pub fn inner(&self, p: &Padding) -> Self {
        Self::new(
            self.x + p.left,
            self.y + p.top,
            self.w - p.horizontal(),
            self.h - p.vertical(),
        )
    }

    /// Remove `n` from the top edge. The origin always moves by the full
    /// amount; the height bottoms out at zero.
    pub fn consume_top(&self, n: i32) -> Self {
        let n = n.max(0);
        Self::new(self.x, self.y + n, self.w, self.h - n)
    }

    /// Remove `n` from the left edge.
    pub fn consume_left(&self, n: i32) -> Self {
        let n = n.max(0);
        Self::new(self.x + n, self.y, self.w - n, self.h)
    }

    /// Remove `n` from the right edge. The origin is unchanged.
    pub fn consume_right(&self, n: i32) -> Self {
        Self::new(self.x, self.y, self.w - n.max(0), self.h)
    }

    /// Remove `n` from the bottom edge. The origin is unchanged.
    pub fn consume_bottom(&self, n: i32) -> Self {
        Self::new(self.x, self.y, self.w, self.h - n.max(0))
    }
}

impl From<(i32, i32, i32, i32)> for Rect {
    #[inline]
    fn from(v: (i32, i32, i32, i32)) -> Self {
        Self::new(v.0, v.1, v.2, v.3)
    }
}
