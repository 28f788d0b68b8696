// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scrollable text widget.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use peniko::Color;
use understory_flow::{Invalidation, Leaf, Point, Rect, Size};

use crate::buffer::{BufferError, BytesReadWriter, ReadWriter};
use crate::drawer::{GlyphSink, TextDrawer};

/// Axes that respond to scroll requests.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Scrollable {
    /// Horizontal scrolling.
    pub x: bool,
    /// Vertical scrolling.
    pub y: bool,
}

/// Colors and face applied to a [`Text`].
#[derive(Clone, Debug, PartialEq)]
pub struct TextTheme<F> {
    /// Text color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Face handed to the drawer.
    pub face: F,
}

/// A text widget: a content buffer seen through a [`TextDrawer`].
///
/// The widget owns its buffer. Every edit goes through [`Text::set_bytes`],
/// [`Text::insert`] or [`Text::delete`], each of which tells the drawer and
/// raises a single content-changed notification.
///
/// Setters do not lay out or paint. They record [`Invalidation`] marks, which
/// the host collects with [`Text::take_invalidation`], or which a
/// [`Tree`](understory_flow::Tree) pulls when the widget is one of its leaves.
pub struct Text<D, B = BytesReadWriter> {
    drawer: D,
    buffer: B,
    scrollable: Scrollable,
    bounds: Rect,
    bg: Color,
    invalidation: Invalidation,
    revision: u64,
    on_content_changed: Option<Box<dyn FnMut()>>,
}

impl<D: fmt::Debug, B: fmt::Debug> fmt::Debug for Text<D, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Text")
            .field("drawer", &self.drawer)
            .field("buffer", &self.buffer)
            .field("scrollable", &self.scrollable)
            .field("bounds", &self.bounds)
            .field("bg", &self.bg)
            .field("invalidation", &self.invalidation)
            .field("revision", &self.revision)
            .field("on_content_changed", &self.on_content_changed.is_some())
            .finish()
    }
}

impl<D: TextDrawer> Text<D> {
    /// Creates an empty text over a [`BytesReadWriter`].
    pub fn new(drawer: D) -> Self {
        Self::with_buffer(drawer, BytesReadWriter::new())
    }
}

impl<D: TextDrawer, B: ReadWriter> Text<D, B> {
    /// Creates a text over an existing buffer.
    ///
    /// Neither axis is scrollable until [`Text::set_scrollable`] is called.
    pub fn with_buffer(mut drawer: D, buffer: B) -> Self {
        drawer.content_changed();
        Self {
            drawer,
            buffer,
            scrollable: Scrollable::default(),
            bounds: Rect::ZERO,
            bg: Color::TRANSPARENT,
            invalidation: Invalidation::LAYOUT_AND_PAINT,
            revision: 0,
            on_content_changed: None,
        }
    }

    /// The drawer.
    pub fn drawer(&self) -> &D {
        &self.drawer
    }

    /// The content buffer. Edits must go through the widget.
    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    /// Number of content-changed notifications raised so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Registers a callback run after every content change.
    pub fn set_on_content_changed(&mut self, f: impl FnMut() + 'static) {
        self.on_content_changed = Some(Box::new(f));
    }

    /// Marks raised since the last call, cleared.
    pub fn take_invalidation(&mut self) -> Invalidation {
        core::mem::take(&mut self.invalidation)
    }

    /// Marks raised since the last [`Text::take_invalidation`].
    pub fn invalidation(&self) -> Invalidation {
        self.invalidation
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if there is no content.
    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// The whole content.
    pub fn bytes(&self) -> Result<&[u8], BufferError> {
        self.buffer.read_n_slice_at(0, self.buffer.len())
    }

    /// The whole content as text.
    ///
    /// Invalid UTF-8 is replaced; an unreadable buffer yields an empty string.
    pub fn str(&self) -> Cow<'_, str> {
        match self.bytes() {
            Ok(bytes) => String::from_utf8_lossy(bytes),
            Err(_) => Cow::Borrowed(""),
        }
    }

    /// Replaces the whole content.
    ///
    /// Deleting and inserting count as one edit: a failing delete returns its
    /// error and nothing is notified; once the delete succeeded, the change is
    /// notified exactly once and any insert error is returned afterwards.
    pub fn set_bytes(&mut self, data: &[u8]) -> Result<(), BufferError> {
        let old_len = self.buffer.len();
        self.buffer.delete(0, old_len)?;
        let inserted = self.buffer.insert(0, data);
        self.content_changed(old_len);
        inserted
    }

    /// Replaces the whole content with `s`. See [`Text::set_bytes`].
    pub fn set_str(&mut self, s: &str) -> Result<(), BufferError> {
        self.set_bytes(s.as_bytes())
    }

    /// Inserts `data` at `offset`.
    pub fn insert(&mut self, offset: usize, data: &[u8]) -> Result<(), BufferError> {
        let old_len = self.buffer.len();
        self.buffer.insert(offset, data)?;
        self.content_changed(old_len);
        Ok(())
    }

    /// Deletes `start..end`.
    pub fn delete(&mut self, start: usize, end: usize) -> Result<(), BufferError> {
        let old_len = self.buffer.len();
        self.buffer.delete(start, end)?;
        self.content_changed(old_len);
        Ok(())
    }

    /// Single notification point for content edits.
    fn content_changed(&mut self, old_len: usize) {
        self.drawer.content_changed();
        let len = self.buffer.len();
        if self.drawer.rune_offset() > len {
            // Keep the first visible position inside the content.
            self.drawer.set_rune_offset(len);
        }
        // Content can change the measured size, not just the pixels.
        self.invalidation |= Invalidation::LAYOUT_AND_PAINT;
        self.revision += 1;
        tracing::debug!(
            old_len,
            new_len = len,
            revision = self.revision,
            "text content changed"
        );
        if let Some(f) = self.on_content_changed.as_mut() {
            f();
        }
    }

    /// Axes that respond to scroll requests.
    pub fn scrollable(&self) -> Scrollable {
        self.scrollable
    }

    /// Sets which axes respond to scroll requests.
    pub fn set_scrollable(&mut self, x: bool, y: bool) {
        self.scrollable = Scrollable { x, y };
    }

    /// Content index of the first visible position.
    pub fn rune_offset(&self) -> usize {
        self.drawer.rune_offset()
    }

    /// Scrolls so that `offset` is the first visible position.
    ///
    /// Does nothing unless vertical scrolling is enabled and `offset` differs
    /// from the current one.
    pub fn set_rune_offset(&mut self, offset: usize) {
        let current = self.drawer.rune_offset();
        if !self.scrollable.y || current == offset {
            return;
        }
        tracing::debug!(from = current, to = offset, "text scrolled");
        self.drawer.set_rune_offset(offset);
        self.invalidation |= Invalidation::LAYOUT_AND_PAINT;
    }

    /// Returns `true` if the position `offset` is in view.
    pub fn index_visible(&mut self, offset: usize) -> bool {
        self.drawer.range_visible(&self.buffer, offset, 0)
    }

    /// Scrolls the least amount that brings `offset` into view.
    pub fn make_index_visible(&mut self, offset: usize) {
        self.make_range_visible(offset, 0);
    }

    /// Scrolls the least amount that brings `offset..offset + len` into view.
    pub fn make_range_visible(&mut self, offset: usize, len: usize) {
        let o = self.drawer.range_visible_offset(&self.buffer, offset, len);
        self.set_rune_offset(o);
    }

    /// Top-left corner of the position `index`.
    pub fn point_of(&mut self, index: usize) -> Point {
        self.drawer.point_of(&self.buffer, index)
    }

    /// Content index nearest to `point`.
    pub fn index_of(&mut self, point: Point) -> usize {
        self.drawer.index_of(&self.buffer, point)
    }

    /// Height of one line.
    pub fn line_height(&self) -> i32 {
        self.drawer.line_height()
    }

    /// Current bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Size the content needs within `hint`, anchored at the current origin.
    ///
    /// The drawer is left with the hinted bounds; [`Text::layout`] restores
    /// the real ones.
    pub fn measure(&mut self, hint: Size) -> Size {
        let origin = self.bounds.min;
        self.drawer.set_bounds(Rect::from_origin_size(origin, hint));
        self.drawer.measure(&self.buffer).min(hint)
    }

    /// Takes the final bounds, forwarding them to the drawer when it has
    /// different ones.
    pub fn layout(&mut self, bounds: Rect) {
        self.bounds = bounds;
        if self.drawer.bounds() != bounds {
            self.drawer.set_bounds(bounds);
            self.invalidation |= Invalidation::NEEDS_PAINT;
        }
    }

    /// Background color.
    pub fn bg(&self) -> Color {
        self.bg
    }

    /// Applies colors and face.
    ///
    /// A new face can change line metrics and is marked for layout; color
    /// changes only need paint.
    pub fn set_theme(&mut self, theme: TextTheme<D::Face>) {
        self.drawer.set_fg(theme.fg);
        self.bg = theme.bg;
        if *self.drawer.face() != theme.face {
            self.drawer.set_face(theme.face);
            self.invalidation |= Invalidation::LAYOUT_AND_PAINT;
        } else {
            self.invalidation |= Invalidation::NEEDS_PAINT;
        }
    }

    /// Fills the background, then draws the visible text.
    pub fn paint(&mut self, sink: &mut dyn GlyphSink) {
        sink.fill_rect(self.bounds.into(), self.bg);
        self.drawer.draw(&self.buffer, sink);
    }
}

impl<D: TextDrawer, B: ReadWriter> Leaf for Text<D, B> {
    fn measure(&mut self, hint: Size) -> Size {
        Self::measure(self, hint)
    }

    fn layout(&mut self, bounds: Rect) {
        Self::layout(self, bounds);
    }

    fn take_invalidation(&mut self) -> Invalidation {
        Self::take_invalidation(self)
    }
}

#[cfg(test)]
mod tests {
    use understory_flow::{Invalidation, Rect, Size};

    use super::Text;
    use crate::mono::{MonoDrawer, MonoFace};

    #[test]
    fn str_is_lossy() {
        let mut t = Text::new(MonoDrawer::default());
        t.set_bytes(b"ok\xffok").unwrap();
        assert_eq!(t.str(), "ok\u{fffd}ok");
        assert_eq!(t.len(), 5);
    }

    #[test]
    fn measure_is_clamped_to_the_hint() {
        let mut t = Text::new(MonoDrawer::new(MonoFace::new(10, 10)));
        t.set_str("0123456789\nab").unwrap();
        assert_eq!(t.measure(Size::new(500, 500)), Size::new(100, 20));
        assert_eq!(t.measure(Size::new(50, 15)), Size::new(50, 15));
    }

    #[test]
    fn layout_marks_paint_only_on_change() {
        let mut t = Text::new(MonoDrawer::default());
        let _ = t.take_invalidation();
        t.layout(Rect::new(0, 0, 100, 100));
        assert_eq!(t.take_invalidation(), Invalidation::NEEDS_PAINT);
        t.layout(Rect::new(0, 0, 100, 100));
        assert_eq!(t.take_invalidation(), Invalidation::empty());
    }

    #[test]
    fn edits_notify_once_each() {
        let mut t = Text::new(MonoDrawer::default());
        t.set_str("hello").unwrap();
        t.insert(5, b" world").unwrap();
        t.delete(0, 6).unwrap();
        assert_eq!(t.str(), "world");
        assert_eq!(t.revision(), 3);
        assert!(t.delete(3, 99).is_err());
        assert_eq!(t.revision(), 3);
    }
}
