// Copyright 2026 the Lacquer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel-space rectangles and box areas.
//!
//! Layout and ink-overflow math happens in floating point using
//! [`kurbo::Rect`]. Damage and scissor regions live on the pixel grid, so they
//! use [`IntRect`], produced from float rectangles with
//! [`IntRect::from_rect_expanded`].

use kurbo::Rect;

/// An axis-aligned rectangle on the pixel grid, given by two corners.
///
/// A rectangle is *valid* when `x0 <= x1` and `y0 <= y1`. Zero-area
/// rectangles are valid; inverted ones are not. Stored damage and scissor
/// regions are always valid and use `Option<IntRect>` to express absence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    /// Left edge.
    pub x0: i32,
    /// Top edge.
    pub y0: i32,
    /// Right edge (exclusive).
    pub x1: i32,
    /// Bottom edge (exclusive).
    pub y1: i32,
}

impl IntRect {
    /// Creates a rectangle from its corners.
    #[inline]
    #[must_use]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Returns `true` if the corners are not inverted.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.x0 <= self.x1 && self.y0 <= self.y1
    }

    /// Width of the rectangle, saturating at `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn width(self) -> i32 {
        self.x1.saturating_sub(self.x0)
    }

    /// Height of the rectangle, saturating at `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn height(self) -> i32 {
        self.y1.saturating_sub(self.y0)
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// The smallest rectangle covering both `self` and `other`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// The overlap of `self` and `other`.
    ///
    /// Disjoint rectangles produce an empty (but still valid) rectangle
    /// positioned at the near corner of the overlap.
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        let x0 = self.x0.max(other.x0);
        let y0 = self.y0.max(other.y0);
        Self {
            x0,
            y0,
            x1: self.x1.min(other.x1).max(x0),
            y1: self.y1.min(other.y1).max(y0),
        }
    }

    /// Rounds a float rectangle outward to the pixel grid.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "coordinates are integral after expand and saturate on overflow"
    )]
    #[must_use]
    pub fn from_rect_expanded(rect: Rect) -> Self {
        let rect = rect.expand();
        Self {
            x0: rect.x0 as i32,
            y0: rect.y0 as i32,
            x1: rect.x1 as i32,
            y1: rect.y1 as i32,
        }
    }
}

/// Intersects two optional regions, treating `None` as "unbounded".
///
/// Used for scissor math: clipping a region against an absent scissor leaves
/// it unchanged, and an absent region takes the scissor as-is.
#[must_use]
pub fn intersect_if_valid(region: Option<IntRect>, clip: Option<IntRect>) -> Option<IntRect> {
    match (region, clip) {
        (Some(region), Some(clip)) => Some(region.intersect(clip)),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

/// Unions two rectangles, skipping whichever is invalid.
///
/// Returns `None` only when both are invalid.
#[must_use]
pub fn union_if_valid(a: IntRect, b: IntRect) -> Option<IntRect> {
    match (a.is_valid(), b.is_valid()) {
        (true, true) => Some(a.union(b)),
        (true, false) => Some(a),
        (false, true) => Some(b),
        (false, false) => None,
    }
}

/// The edge of an element's box model an effect is anchored to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BoxArea {
    /// Outer margin edge.
    Margin,
    /// Border edge.
    Border,
    /// Padding edge.
    Padding,
    /// Content edge.
    Content,
    /// Unspecified: each consumer picks its own default.
    #[default]
    Auto,
}

impl BoxArea {
    /// Returns `self`, or `default` if `self` is [`BoxArea::Auto`].
    #[inline]
    #[must_use]
    pub const fn or(self, default: Self) -> Self {
        match self {
            Self::Auto => default,
            area => area,
        }
    }

    /// Returns `true` for the areas a decorator can paint into.
    #[inline]
    #[must_use]
    pub const fn is_paint_area(self) -> bool {
        matches!(self, Self::Border | Self::Padding | Self::Content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_covers_both() {
        let a = IntRect::new(0, 0, 10, 10);
        let b = IntRect::new(5, 5, 20, 20);
        assert_eq!(a.union(b), IntRect::new(0, 0, 20, 20));
    }

    #[test]
    fn disjoint_intersection_is_empty_not_inverted() {
        let a = IntRect::new(0, 0, 10, 10);
        let b = IntRect::new(20, 20, 30, 30);
        let i = a.intersect(b);
        assert!(i.is_valid(), "intersection must never invert: {i:?}");
        assert!(i.is_empty(), "disjoint intersection covers nothing");
    }

    #[test]
    fn extent_saturates_at_extreme_corners() {
        let wide = IntRect::new(i32::MIN, -1, i32::MAX, i32::MAX);
        assert_eq!(wide.width(), i32::MAX);
        assert_eq!(wide.height(), i32::MAX);
        assert!(!wide.is_empty(), "saturated extent still covers pixels");
        assert!(IntRect::new(i32::MAX, 0, i32::MIN, 1).is_empty());
    }

    #[test]
    fn expanded_rect_rounds_outward() {
        let r = IntRect::from_rect_expanded(Rect::new(0.4, 1.6, 9.2, 9.9));
        assert_eq!(r, IntRect::new(0, 1, 10, 10));
    }

    #[test]
    fn intersect_if_valid_treats_none_as_unbounded() {
        let r = IntRect::new(0, 0, 10, 10);
        let clip = IntRect::new(5, 0, 50, 50);
        assert_eq!(intersect_if_valid(Some(r), None), Some(r));
        assert_eq!(intersect_if_valid(None, Some(clip)), Some(clip));
        assert_eq!(
            intersect_if_valid(Some(r), Some(clip)),
            Some(IntRect::new(5, 0, 10, 10))
        );
        assert_eq!(intersect_if_valid(None, None), None);
    }

    #[test]
    fn union_if_valid_skips_inverted() {
        let good = IntRect::new(0, 0, 4, 4);
        let bad = IntRect::new(4, 4, 0, 0);
        assert_eq!(union_if_valid(good, bad), Some(good));
        assert_eq!(union_if_valid(bad, good), Some(good));
        assert_eq!(union_if_valid(bad, bad), None);
    }

    #[test]
    fn auto_area_falls_back() {
        assert_eq!(BoxArea::Auto.or(BoxArea::Padding), BoxArea::Padding);
        assert_eq!(BoxArea::Content.or(BoxArea::Padding), BoxArea::Content);
        assert!(!BoxArea::Margin.is_paint_area());
    }
}
