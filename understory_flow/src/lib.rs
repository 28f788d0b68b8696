// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_flow --heading-base-level=0

//! Understory Flow: dual-axis flow layout over a node tree.
//!
//! This crate measures and positions a tree of nodes. A flow container lines
//! its children up along one axis; the same algorithm serves rows and columns
//! by translating coordinates through an [`Axis`].
//!
//! - [`Tree`]: arena of nodes addressed by generational [`NodeId`]s.
//! - [`NodeKind`]: flow container, fixed-size node, or host [`Leaf`] content.
//! - [`SizePolicy`]: expand and fill bits per axis. Layout looks at the policy
//!   of a whole subtree: a node expands "in tree" if it or any descendant does.
//! - [`Invalidation`]: deferred layout and paint marks, drained once per tick.
//!
//! ## Layout in two passes
//!
//! [`Tree::measure`] asks a node how large it wants to be for a given hint,
//! without writing any bounds. [`Tree::calc_childs_bounds`] takes a node whose
//! own bounds are final and assigns bounds to its children, recursing down the
//! tree. [`Tree::layout`] does both for a root.
//!
//! ```rust
//! use understory_flow::{FlowLayout, NodeKind, Rect, Size, SizePolicy, Tree};
//!
//! let mut tree = Tree::<()>::new();
//! let column = tree.insert(None, NodeKind::Flow(FlowLayout::vertical())).unwrap();
//! let toolbar = tree.insert(Some(column), NodeKind::Fixed(Size::new(0, 24))).unwrap();
//! tree.set_fill(toolbar, true, false).unwrap();
//! let body = tree.insert(Some(column), NodeKind::Fixed(Size::ZERO)).unwrap();
//! tree.set_policy(body, SizePolicy::all()).unwrap();
//!
//! tree.layout(column, Rect::new(0, 0, 640, 480));
//! assert_eq!(tree.bounds(toolbar), Some(Rect::new(0, 0, 640, 24)));
//! assert_eq!(tree.bounds(body), Some(Rect::new(0, 24, 640, 480)));
//! ```
//!
//! ## Rounding
//!
//! Space is split with integer division and the remainder is not handed out.
//! Three expanding children in 301 pixels get 100 each. If the last child also
//! fills, its trailing edge is snapped to the container's edge instead.
//!
//! ## Deferred work
//!
//! Setters record [`Invalidation`] marks and return. Hosts call
//! [`Tree::layout_if_needed`] and [`Tree::drain_paint`] once per frame.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod axis;
mod flow;
mod geometry;
mod invalidation;
mod policy;
mod tree;

pub use axis::Axis;
pub use flow::FlowLayout;
pub use geometry::{Point, Rect, Size};
pub use invalidation::Invalidation;
pub use policy::SizePolicy;
pub use tree::{Leaf, NodeId, NodeKind, Tree, TreeError};
