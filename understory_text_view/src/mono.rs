// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A monospace [`TextDrawer`].
//!
//! Every character occupies one or two cells of a fixed advance, as reported
//! by `unicode-width`. Lines break hard at `\n` and wrap softly at the bounds
//! width. Bytes that are not valid UTF-8 are shown as U+FFFD, one cell each.

use alloc::vec::Vec;

use peniko::Color;
use understory_flow::{Point, Rect, Size};
use unicode_width::UnicodeWidthChar;

use crate::buffer::Reader;
use crate::drawer::{GlyphSink, TextDrawer};

/// Cell metrics of a monospace face, in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MonoFace {
    /// Width of a single-width cell.
    pub advance: i32,
    /// Height of a line.
    pub line_height: i32,
}

impl MonoFace {
    /// Creates a face with the given cell metrics.
    #[must_use]
    pub const fn new(advance: i32, line_height: i32) -> Self {
        Self {
            advance,
            line_height,
        }
    }
}

impl Default for MonoFace {
    fn default() -> Self {
        Self::new(8, 16)
    }
}

/// One visual line. `end` excludes the line break.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Line {
    start: usize,
    end: usize,
    width: i32,
}

impl Line {
    const fn empty_at(at: usize) -> Self {
        Self {
            start: at,
            end: at,
            width: 0,
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct Cell {
    at: usize,
    len: usize,
    ch: char,
    cols: i32,
}

fn columns(ch: char) -> i32 {
    match ch.width() {
        Some(0) | None => 0,
        Some(2) => 2,
        Some(_) => 1,
    }
}

/// Decodes `bytes` into cells; `at` is relative to the start of `bytes`.
fn cells(bytes: &[u8]) -> impl Iterator<Item = Cell> + '_ {
    let mut base = 0;
    bytes.utf8_chunks().flat_map(move |chunk| {
        let start = base;
        let valid = chunk.valid();
        let invalid_at = start + valid.len();
        base = invalid_at + chunk.invalid().len();
        let valid_cells = valid.char_indices().map(move |(i, ch)| Cell {
            at: start + i,
            len: ch.len_utf8(),
            ch,
            cols: columns(ch),
        });
        let invalid_cells = (invalid_at..base).map(|at| Cell {
            at,
            len: 1,
            ch: char::REPLACEMENT_CHARACTER,
            cols: 1,
        });
        valid_cells.chain(invalid_cells)
    })
}

fn wrap(bytes: &[u8], width: i32, advance: i32) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut line = Line::empty_at(0);
    for cell in cells(bytes) {
        if cell.ch == '\n' {
            lines.push(line);
            line = Line::empty_at(cell.at + 1);
            continue;
        }
        let w = cell.cols * advance;
        // A line always takes at least one cell, however narrow the bounds.
        if width > 0 && line.width > 0 && line.width + w > width {
            lines.push(line);
            line = Line::empty_at(cell.at);
        }
        line.width += w;
        line.end = cell.at + cell.len;
    }
    lines.push(line);
    lines
}

fn line_of(lines: &[Line], index: usize) -> usize {
    lines
        .partition_point(|l| l.start <= index)
        .saturating_sub(1)
}

fn to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Reference [`TextDrawer`] with fixed cell metrics.
///
/// Wrapped lines are cached and rebuilt on the first query after the content,
/// the bounds width, or the face changes.
#[derive(Clone, Debug)]
pub struct MonoDrawer {
    bounds: Rect,
    offset: usize,
    face: MonoFace,
    fg: Color,
    lines: Vec<Line>,
    wrapped_at: Option<i32>,
}

impl Default for MonoDrawer {
    fn default() -> Self {
        Self::new(MonoFace::default())
    }
}

impl MonoDrawer {
    /// Creates a drawer with empty bounds and black text.
    #[must_use]
    pub fn new(face: MonoFace) -> Self {
        Self {
            bounds: Rect::ZERO,
            offset: 0,
            face,
            fg: Color::BLACK,
            lines: Vec::new(),
            wrapped_at: None,
        }
    }

    /// Number of visual lines for `content` at the current bounds.
    pub fn line_count(&mut self, content: &dyn Reader) -> usize {
        self.ensure_lines(content);
        self.lines.len()
    }

    fn ensure_lines(&mut self, content: &dyn Reader) {
        let width = self.bounds.dx();
        if self.wrapped_at == Some(width) {
            return;
        }
        let bytes = match content.read_n_slice_at(0, content.len()) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(%err, "content unreadable, drawing nothing");
                &[]
            }
        };
        self.lines = wrap(bytes, width, self.face.advance);
        self.wrapped_at = Some(width);
        tracing::trace!(width, lines = self.lines.len(), "rewrapped text");
    }

    fn line_height_px(&self) -> i32 {
        self.face.line_height.max(1)
    }

    /// Lines that fit entirely in the bounds.
    fn full_rows(&self) -> usize {
        usize::try_from(self.bounds.dy() / self.line_height_px()).unwrap_or(0)
    }

    /// Lines that are at least partly in the bounds.
    fn drawn_rows(&self) -> usize {
        let lh = self.line_height_px();
        usize::try_from((self.bounds.dy() + lh - 1) / lh).unwrap_or(0)
    }

    fn first_line(&self) -> usize {
        line_of(&self.lines, self.offset)
    }

    /// Lines holding the first and last byte of `offset..offset + len`.
    fn line_span(&self, offset: usize, len: usize) -> (usize, usize) {
        let last = offset.saturating_add(len.saturating_sub(1));
        (line_of(&self.lines, offset), line_of(&self.lines, last))
    }
}

impl TextDrawer for MonoDrawer {
    type Face = MonoFace;

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn content_changed(&mut self) {
        self.wrapped_at = None;
    }

    fn measure(&mut self, content: &dyn Reader) -> Size {
        self.ensure_lines(content);
        let width = self.lines.iter().map(|l| l.width).max().unwrap_or(0);
        Size::new(width, to_i32(self.lines.len()) * self.line_height_px())
    }

    fn rune_offset(&self) -> usize {
        self.offset
    }

    fn set_rune_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    fn range_visible(&mut self, content: &dyn Reader, offset: usize, len: usize) -> bool {
        self.ensure_lines(content);
        let first = self.first_line();
        let (a, b) = self.line_span(offset, len);
        a >= first && b < first + self.full_rows()
    }

    fn range_visible_offset(&mut self, content: &dyn Reader, offset: usize, len: usize) -> usize {
        if self.range_visible(content, offset, len) {
            return self.offset;
        }
        let first = self.first_line();
        let rows = self.full_rows().max(1);
        let (a, b) = self.line_span(offset, len);
        let target = if a < first || b - a + 1 > rows {
            a
        } else {
            b + 1 - rows
        };
        self.lines[target].start
    }

    fn point_of(&mut self, content: &dyn Reader, index: usize) -> Point {
        self.ensure_lines(content);
        let i = line_of(&self.lines, index);
        let line = self.lines[i];
        let upto = index.clamp(line.start, line.end);
        let x = content
            .read_n_slice_at(line.start, upto - line.start)
            .map_or(0, |bytes| {
                cells(bytes).map(|c| c.cols * self.face.advance).sum()
            });
        let row = to_i32(i) - to_i32(self.first_line());
        Point::new(
            self.bounds.min.x + x,
            self.bounds.min.y + row * self.line_height_px(),
        )
    }

    fn index_of(&mut self, content: &dyn Reader, point: Point) -> usize {
        self.ensure_lines(content);
        let row = (point.y - self.bounds.min.y).div_euclid(self.line_height_px());
        let last = self.lines.len() - 1;
        let i = if row < 0 {
            self.first_line()
                .saturating_sub(usize::try_from(row.unsigned_abs()).unwrap_or(usize::MAX))
        } else {
            self.first_line()
                .saturating_add(usize::try_from(row).unwrap_or(usize::MAX))
                .min(last)
        };
        let line = self.lines[i];
        let Ok(bytes) = content.read_n_slice_at(line.start, line.end - line.start) else {
            return line.start;
        };
        let x = point.x - self.bounds.min.x;
        let mut acc = 0;
        for cell in cells(bytes) {
            let w = cell.cols * self.face.advance;
            if x < acc + w / 2 {
                return line.start + cell.at;
            }
            acc += w;
        }
        line.end
    }

    fn line_height(&self) -> i32 {
        self.line_height_px()
    }

    fn fg(&self) -> Color {
        self.fg
    }

    fn set_fg(&mut self, fg: Color) {
        self.fg = fg;
    }

    fn face(&self) -> &MonoFace {
        &self.face
    }

    fn set_face(&mut self, face: MonoFace) {
        if self.face != face {
            self.face = face;
            self.wrapped_at = None;
        }
    }

    fn draw(&mut self, content: &dyn Reader, sink: &mut dyn GlyphSink) {
        self.ensure_lines(content);
        let first = self.first_line();
        let lh = self.line_height_px();
        let visible = self.lines.iter().skip(first).take(self.drawn_rows());
        for (row, line) in visible.enumerate() {
            let Ok(bytes) = content.read_n_slice_at(line.start, line.end - line.start) else {
                continue;
            };
            let y = self.bounds.min.y + to_i32(row) * lh;
            let mut x = self.bounds.min.x;
            for cell in cells(bytes) {
                sink.glyph(Point::new(x, y).into(), cell.ch, self.fg);
                x += cell.cols * self.face.advance;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use peniko::Color;
    use understory_flow::{Point, Rect, Size};

    use super::{MonoDrawer, MonoFace};
    use crate::buffer::BytesReadWriter;
    use crate::drawer::{GlyphSink, TextDrawer};

    fn drawer(w: i32, h: i32) -> MonoDrawer {
        let mut d = MonoDrawer::new(MonoFace::new(10, 20));
        d.set_bounds(Rect::new(0, 0, w, h));
        d
    }

    #[test]
    fn hard_breaks_and_soft_wraps() {
        let text = BytesReadWriter::from("abcdefg\nhi\n");
        let mut d = drawer(30, 100);
        // "abc" "def" "g" "hi" ""
        assert_eq!(d.line_count(&text), 5);
        assert_eq!(d.measure(&text), Size::new(30, 100));

        d.set_bounds(Rect::new(0, 0, 1000, 100));
        assert_eq!(d.line_count(&text), 3);
        assert_eq!(d.measure(&text), Size::new(70, 60));
    }

    #[test]
    fn narrow_bounds_still_place_one_cell_per_line() {
        let text = BytesReadWriter::from("abc");
        let mut d = drawer(5, 100);
        assert_eq!(d.line_count(&text), 3);
    }

    #[test]
    fn wide_characters_take_two_cells() {
        let text = BytesReadWriter::from("a\u{4e2d}b");
        let mut d = drawer(1000, 100);
        assert_eq!(d.measure(&text), Size::new(40, 20));
        // '中' is three bytes long.
        assert_eq!(d.point_of(&text, 1), Point::new(10, 0));
        assert_eq!(d.point_of(&text, 4), Point::new(30, 0));
    }

    #[test]
    fn invalid_utf8_shows_replacement_cells() {
        let text = BytesReadWriter::from(alloc::vec![b'a', 0xff, 0xfe, b'b']);
        let mut d = drawer(1000, 100);
        assert_eq!(d.measure(&text), Size::new(40, 20));
        assert_eq!(d.point_of(&text, 3), Point::new(30, 0));
    }

    #[test]
    fn point_and_index_round_trip_at_line_starts() {
        let text = BytesReadWriter::from("one\ntwo three\n\nfour");
        let mut d = drawer(50, 200);
        let n = d.line_count(&text);
        for i in 0..n {
            let start = d.lines[i].start;
            let p = d.point_of(&text, start);
            assert_eq!(p.x, 0);
            assert_eq!(d.index_of(&text, p), start);
        }
    }

    #[test]
    fn index_of_picks_the_nearest_boundary() {
        let text = BytesReadWriter::from("abcd");
        let mut d = drawer(1000, 100);
        assert_eq!(d.index_of(&text, Point::new(4, 5)), 0);
        assert_eq!(d.index_of(&text, Point::new(6, 5)), 1);
        assert_eq!(d.index_of(&text, Point::new(500, 5)), 4);
        assert_eq!(d.index_of(&text, Point::new(-20, -50)), 0);
        assert_eq!(d.index_of(&text, Point::new(0, 900)), 0);
    }

    #[test]
    fn points_follow_the_scroll_offset() {
        let text = BytesReadWriter::from("l0\nl1\nl2\nl3");
        let mut d = drawer(1000, 40);
        d.set_rune_offset(6);
        assert_eq!(d.point_of(&text, 6), Point::new(0, 0));
        assert_eq!(d.point_of(&text, 0), Point::new(0, -40));
        assert_eq!(d.index_of(&text, Point::new(0, 25)), 9);
    }

    fn lines_of_ten(n: usize) -> BytesReadWriter {
        let mut bytes = Vec::new();
        for _ in 0..n {
            bytes.extend_from_slice(b"123456789\n");
        }
        BytesReadWriter::from(bytes)
    }

    #[test]
    fn visibility_counts_only_whole_lines() {
        let text = lines_of_ten(10);
        // Two full rows and half of a third.
        let mut d = drawer(1000, 50);
        assert!(d.range_visible(&text, 0, 0));
        assert!(d.range_visible(&text, 5, 10));
        assert!(!d.range_visible(&text, 5, 20));
        assert!(!d.range_visible(&text, 20, 0));
    }

    #[test]
    fn visible_offset_scrolls_the_least() {
        let text = lines_of_ten(100);
        let mut d = drawer(1000, 80);
        // Already visible: stays put.
        assert_eq!(d.range_visible_offset(&text, 15, 0), 0);
        // Below: the target line becomes the last of four rows.
        assert_eq!(d.range_visible_offset(&text, 95, 0), 60);
        d.set_rune_offset(500);
        // Above: the target line becomes the first row.
        assert_eq!(d.range_visible_offset(&text, 123, 0), 120);
        // Taller than the viewport: show the start.
        assert_eq!(d.range_visible_offset(&text, 700, 100), 700);
    }

    #[derive(Default)]
    struct Glyphs(Vec<(kurbo::Point, char)>);

    impl GlyphSink for Glyphs {
        fn fill_rect(&mut self, _rect: kurbo::Rect, _color: Color) {}

        fn glyph(&mut self, origin: kurbo::Point, ch: char, _color: Color) {
            self.0.push((origin, ch));
        }
    }

    #[test]
    fn draw_emits_only_visible_lines() {
        let text = BytesReadWriter::from("ab\ncd\nef");
        let mut d = drawer(1000, 30);
        d.set_bounds(Rect::new(5, 5, 1005, 35));
        d.set_rune_offset(3);
        let mut sink = Glyphs::default();
        d.draw(&text, &mut sink);
        assert_eq!(
            sink.0,
            [
                (kurbo::Point::new(5., 5.), 'c'),
                (kurbo::Point::new(15., 5.), 'd'),
                (kurbo::Point::new(5., 25.), 'e'),
                (kurbo::Point::new(15., 25.), 'f'),
            ]
        );
    }

    #[test]
    fn zero_line_height_counts_as_one_pixel() {
        let text = BytesReadWriter::from("a\nb\nc");
        let mut d = MonoDrawer::new(MonoFace::new(8, 0));
        d.set_bounds(Rect::new(0, 0, 80, 2));
        assert_eq!(d.line_height(), 1);
        assert_eq!(d.measure(&text), Size::new(8, 3));
        assert_eq!(d.point_of(&text, 4), Point::new(0, 2));
        assert!(d.range_visible(&text, 2, 0));
        assert!(!d.range_visible(&text, 4, 0));
    }

    #[test]
    fn face_change_rewraps() {
        let text = BytesReadWriter::from("abcdef");
        let mut d = drawer(30, 100);
        assert_eq!(d.line_count(&text), 2);
        d.set_face(MonoFace::new(5, 20));
        assert_eq!(d.line_count(&text), 1);
    }
}
