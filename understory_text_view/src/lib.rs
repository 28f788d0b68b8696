// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_text_view --heading-base-level=0

//! Understory Text View: a scrollable text viewport.
//!
//! [`Text`] keeps a scroll offset, measured in content positions, consistent
//! with a line-wrapping [`TextDrawer`] and with edits to its content buffer.
//!
//! - [`Reader`], [`Writer`], [`ReadWriter`]: linear byte buffers, with
//!   [`BytesReadWriter`] as the default.
//! - [`TextDrawer`]: line breaking, measuring, visibility queries and
//!   index/point mapping. [`MonoDrawer`] is a monospace implementation.
//! - [`Text`]: the widget. It implements [`understory_flow::Leaf`], so it can
//!   be placed in a flow layout tree.
//!
//! ## Scrolling
//!
//! The drawer holds the offset of the first visible position. Visibility
//! requests ask the drawer for the offset that brings a range into view and
//! apply it through [`Text::set_rune_offset`], which does nothing when the
//! vertical axis is not scrollable or the offset would not change.
//!
//! ```rust
//! use understory_flow::Rect;
//! use understory_text_view::{MonoDrawer, MonoFace, Text};
//!
//! let mut text = Text::new(MonoDrawer::new(MonoFace::new(8, 16)));
//! text.set_scrollable(false, true);
//! text.set_str("alpha\nbeta\ngamma\ndelta").unwrap();
//! text.layout(Rect::new(0, 0, 200, 32));
//!
//! // Two lines fit; "delta" starts on the fourth.
//! assert!(!text.index_visible(17));
//! text.make_index_visible(17);
//! assert_eq!(text.rune_offset(), 11);
//! assert!(text.index_visible(17));
//! ```
//!
//! ## Edits
//!
//! Every edit tells the drawer, marks the widget for layout and paint, and
//! runs the optional content-changed callback, exactly once per call.
//! Replacing the content with [`Text::set_bytes`] is a single edit.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod buffer;
mod drawer;
mod mono;
mod text;

pub use buffer::{BufferError, BytesReadWriter, ReadWriter, Reader, Writer};
pub use drawer::{GlyphSink, TextDrawer};
pub use mono::{MonoDrawer, MonoFace};
pub use text::{Scrollable, Text, TextTheme};
