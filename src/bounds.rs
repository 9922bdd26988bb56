//! World rectangle and collision boxes.

use serde::{Deserialize, Serialize};

/// Inclusive rectangle every entity position must stay inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            left: 0,
            right: 302,
            top: 0,
            bottom: 164,
        }
    }
}

impl Bounds {
    /// Clamp a position into the rectangle
    #[inline]
    pub fn clamp(&self, x: i32, y: i32) -> (i32, i32) {
        (x.clamp(self.left, self.right), y.clamp(self.top, self.bottom))
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.left..=self.right).contains(&x) && (self.top..=self.bottom).contains(&y)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// True when `left <= right` and `top <= bottom`
    pub fn is_valid(&self) -> bool {
        self.left <= self.right && self.top <= self.bottom
    }
}

/// Axis-aligned box anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Square box of side `size` anchored at `(x, y)`
    pub fn square(x: i32, y: i32, size: i32) -> Self {
        Self::new(x, y, size, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamp_outside() {
        let b = Bounds::default();
        assert_eq!(b.clamp(-1, -5), (0, 0));
        assert_eq!(b.clamp(303, 165), (302, 164));
        assert_eq!(b.clamp(400, 10), (302, 10));
    }

    #[test]
    fn test_contains_edges() {
        let b = Bounds::default();
        assert!(b.contains(0, 0));
        assert!(b.contains(302, 164));
        assert!(!b.contains(303, 0));
        assert!(!b.contains(0, -1));
    }

    #[test]
    fn test_validity() {
        assert!(Bounds::default().is_valid());
        let inverted = Bounds {
            left: 10,
            right: 0,
            top: 0,
            bottom: 10,
        };
        assert!(!inverted.is_valid());
    }

    proptest! {
        #[test]
        fn proptest_clamp_idempotent(x in -1000i32..1000, y in -1000i32..1000) {
            let b = Bounds::default();
            let once = b.clamp(x, y);
            prop_assert_eq!(b.clamp(once.0, once.1), once);
            prop_assert!(b.contains(once.0, once.1));
        }

        #[test]
        fn proptest_clamp_inside_is_noop(x in 0i32..=302, y in 0i32..=164) {
            prop_assert_eq!(Bounds::default().clamp(x, y), (x, y));
        }
    }
}
