// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer pixel geometry used by layout.
//!
//! Layout distributes space with integer division, so positions and extents are
//! whole pixels. Conversions into Kurbo's `f64` types are provided for handing
//! results to float-based consumers such as a box tree or a renderer.

use core::ops::{Add, Sub};

/// A point in pixel coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add<Size> for Point {
    type Output = Self;

    fn add(self, rhs: Size) -> Self {
        Self::new(self.x + rhs.width, self.y + rhs.height)
    }
}

impl Sub for Point {
    type Output = Size;

    fn sub(self, rhs: Self) -> Size {
        Size::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A width and height in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl Size {
    /// The empty size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Component-wise minimum.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.width.min(other.width), self.height.min(other.height))
    }

    /// Component-wise maximum.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }
}

/// An axis-aligned rectangle, half-open on its max edges.
///
/// `min` is inclusive and `max` exclusive, so `Rect::new(0, 0, 100, 20)` covers
/// columns `0..100`. A rectangle whose max does not exceed its min on either
/// axis is empty.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Top-left corner (inclusive).
    pub min: Point,
    /// Bottom-right corner (exclusive).
    pub max: Point,
}

impl Rect {
    /// The zero rectangle at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Creates a rectangle from its corner coordinates.
    #[must_use]
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0, y0),
            max: Point::new(x1, y1),
        }
    }

    /// Creates a rectangle from an origin and a size.
    #[must_use]
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// Width.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.max.x - self.min.x
    }

    /// Height.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.max.y - self.min.y
    }

    /// Width and height.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.dx(), self.dy())
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Returns `true` if `p` lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, p: Point) -> bool {
        self.min.x <= p.x && p.x < self.max.x && self.min.y <= p.y && p.y < self.max.y
    }

    /// Largest rectangle contained in both `self` and `other`.
    ///
    /// Returns [`Rect::ZERO`] when they do not overlap.
    #[must_use]
    pub fn intersect(&self, other: Self) -> Self {
        let r = Self::new(
            self.min.x.max(other.min.x),
            self.min.y.max(other.min.y),
            self.max.x.min(other.max.x),
            self.max.y.min(other.max.y),
        );
        if r.is_empty() { Self::ZERO } else { r }
    }

    /// Returns `true` if every pixel of `other` is inside `self`.
    ///
    /// An empty rectangle is inside every rectangle.
    #[must_use]
    pub const fn contains_rect(&self, other: &Self) -> bool {
        if other.is_empty() {
            return true;
        }
        self.min.x <= other.min.x
            && self.min.y <= other.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }
}

impl From<Point> for kurbo::Point {
    fn from(p: Point) -> Self {
        Self::new(f64::from(p.x), f64::from(p.y))
    }
}

impl From<Size> for kurbo::Size {
    fn from(s: Size) -> Self {
        Self::new(f64::from(s.width), f64::from(s.height))
    }
}

impl From<Rect> for kurbo::Rect {
    fn from(r: Rect) -> Self {
        Self::new(
            f64::from(r.min.x),
            f64::from(r.min.y),
            f64::from(r.max.x),
            f64::from(r.max.y),
        )
    }
}
