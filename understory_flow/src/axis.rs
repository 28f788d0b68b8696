// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis translation between caller space and main/cross space.

use crate::geometry::{Point, Rect, Size};

/// Maps caller X/Y coordinates into main/cross coordinates for a flow container.
///
/// A horizontal flow lays children out along X, so main space equals caller
/// space. A vertical flow lays them out along Y; translating swaps X and Y.
/// Every transform is its own inverse, so the same call converts into main
/// space and back out again.
///
/// ```rust
/// use understory_flow::{Axis, Point};
///
/// let p = Point::new(3, 7);
/// assert_eq!(Axis::VERTICAL.point(p), Point::new(7, 3));
/// assert_eq!(Axis::VERTICAL.point(Axis::VERTICAL.point(p)), p);
/// assert_eq!(Axis::HORIZONTAL.point(p), p);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Axis {
    vertical: bool,
}

impl Axis {
    /// Main axis is X.
    pub const HORIZONTAL: Self = Self::new(false);
    /// Main axis is Y.
    pub const VERTICAL: Self = Self::new(true);

    /// Creates a translator; `vertical` selects Y as the main axis.
    #[must_use]
    pub const fn new(vertical: bool) -> Self {
        Self { vertical }
    }

    /// Returns `true` if the main axis is Y.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        self.vertical
    }

    /// Translates a point.
    #[must_use]
    pub const fn point(self, p: Point) -> Point {
        if self.vertical { Point::new(p.y, p.x) } else { p }
    }

    /// Translates a size; `width` becomes the main extent.
    #[must_use]
    pub const fn size(self, s: Size) -> Size {
        if self.vertical {
            Size::new(s.height, s.width)
        } else {
            s
        }
    }

    /// Translates both corners of a rectangle.
    #[must_use]
    pub const fn rect(self, r: Rect) -> Rect {
        Rect {
            min: self.point(r.min),
            max: self.point(r.max),
        }
    }

    /// Orders an `(x, y)` pair as `(main, cross)`.
    ///
    /// Used for per-axis flags such as expand and fill.
    #[must_use]
    pub fn pair<T>(self, x: T, y: T) -> (T, T) {
        if self.vertical { (y, x) } else { (x, y) }
    }
}
