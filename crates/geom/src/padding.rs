/// Spacing reserved inside a node's bounds before children are placed.
///
/// Insets are non-negative; the constructor clamps.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Padding {
    /// Left inset.
    pub left: i32,
    /// Top inset.
    pub top: i32,
    /// Right inset.
    pub right: i32,
    /// Bottom inset.
    pub bottom: i32,
}

impl Padding {
    /// Construct a padding, clamping negative insets to zero.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left: left.max(0),
            top: top.max(0),
            right: right.max(0),
            bottom: bottom.max(0),
        }
    }

    /// The same inset on all four sides.
    pub fn uniform(n: i32) -> Self {
        Self::new(n, n, n, n)
    }

    /// A zero padding.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Sum of the left and right insets.
    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Sum of the top and bottom insets.
    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}

impl From<(i32, i32, i32, i32)> for Padding {
    #[inline]
    fn from(v: (i32, i32, i32, i32)) -> Self {
        Self::new(v.0, v.1, v.2, v.3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_negative_insets() {
        assert_eq!(Padding::new(5, -2, 1, 0), Padding::new(5, 0, 1, 0));
        assert_eq!(Padding::uniform(3).horizontal(), 6);
    }
}
