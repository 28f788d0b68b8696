// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The text drawer interface.

use peniko::Color;
use understory_flow::{Point, Rect, Size};

use crate::buffer::Reader;

/// Receiver of drawing output.
///
/// Coordinates are handed over as Kurbo types so that float-based renderers
/// can consume them directly.
pub trait GlyphSink {
    /// Fills `rect` with a solid color.
    fn fill_rect(&mut self, rect: kurbo::Rect, color: Color);

    /// Draws one character whose cell starts at `origin` (top-left).
    fn glyph(&mut self, origin: kurbo::Point, ch: char, color: Color);
}

/// Line breaking, measuring and position mapping for a text widget.
///
/// A drawer keeps the scroll offset (the content index of the first visible
/// position) along with its bounds and face, and derives wrapped lines from
/// the content lazily. It never owns the content: every query that needs it
/// receives the buffer as a [`Reader`]. Callers must report every edit via
/// [`TextDrawer::content_changed`] before the next query.
///
/// Content indices are byte offsets into the buffer.
pub trait TextDrawer {
    /// Font description used for layout.
    type Face: Clone + PartialEq;

    /// Current bounds.
    fn bounds(&self) -> Rect;

    /// Sets the bounds text is wrapped and drawn in.
    fn set_bounds(&mut self, bounds: Rect);

    /// Drops everything derived from the content.
    fn content_changed(&mut self);

    /// Size the whole content needs when wrapped at the current bounds width.
    fn measure(&mut self, content: &dyn Reader) -> Size;

    /// Content index of the first visible position.
    fn rune_offset(&self) -> usize;

    /// Scrolls so that `offset` is the first visible position.
    fn set_rune_offset(&mut self, offset: usize);

    /// Returns `true` if `offset..offset + len` is entirely in view.
    fn range_visible(&mut self, content: &dyn Reader, offset: usize, len: usize) -> bool;

    /// The scroll offset that brings `offset..offset + len` into view with the
    /// smallest move. Returns the current offset if the range is visible.
    fn range_visible_offset(&mut self, content: &dyn Reader, offset: usize, len: usize) -> usize;

    /// Top-left corner of the position `index`, relative to the current
    /// scroll offset. Positions above the viewport have a `y` above the
    /// bounds.
    fn point_of(&mut self, content: &dyn Reader, index: usize) -> Point;

    /// Content index nearest to `point`.
    fn index_of(&mut self, content: &dyn Reader, point: Point) -> usize;

    /// Height of one line.
    fn line_height(&self) -> i32;

    /// Text color.
    fn fg(&self) -> Color;

    /// Sets the text color.
    fn set_fg(&mut self, fg: Color);

    /// Current face.
    fn face(&self) -> &Self::Face;

    /// Sets the face. Drops derived state when it differs.
    fn set_face(&mut self, face: Self::Face);

    /// Draws the visible part of the content.
    fn draw(&mut self, content: &dyn Reader, sink: &mut dyn GlyphSink);
}
