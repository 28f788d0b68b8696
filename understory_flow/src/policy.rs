// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node sizing policy and its subtree aggregation.

use hashbrown::HashMap;

use crate::axis::Axis;
use crate::tree::{NodeId, Tree};

bitflags::bitflags! {
    /// Expand and fill bits for both axes.
    ///
    /// - *Expand* asks for a share of the leftover main-axis space while
    ///   measuring; on the cross axis it takes the full hinted extent.
    /// - *Fill* stretches the node over the space left after allocation on the
    ///   main axis, and over the full container extent on the cross axis.
    ///
    /// Any combination is valid.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SizePolicy: u8 {
        /// Expand horizontally.
        const EXPAND_X = 0b0000_0001;
        /// Expand vertically.
        const EXPAND_Y = 0b0000_0010;
        /// Fill horizontally.
        const FILL_X   = 0b0000_0100;
        /// Fill vertically.
        const FILL_Y   = 0b0000_1000;
    }
}

impl SizePolicy {
    /// Returns the `(x, y)` expand bits.
    #[must_use]
    pub const fn expand(self) -> (bool, bool) {
        (
            self.contains(Self::EXPAND_X),
            self.contains(Self::EXPAND_Y),
        )
    }

    /// Returns the `(x, y)` fill bits.
    #[must_use]
    pub const fn fill(self) -> (bool, bool) {
        (self.contains(Self::FILL_X), self.contains(Self::FILL_Y))
    }

    /// Returns a copy with the expand bits replaced.
    #[must_use]
    pub fn with_expand(mut self, x: bool, y: bool) -> Self {
        self.set(Self::EXPAND_X, x);
        self.set(Self::EXPAND_Y, y);
        self
    }

    /// Returns a copy with the fill bits replaced.
    #[must_use]
    pub fn with_fill(mut self, x: bool, y: bool) -> Self {
        self.set(Self::FILL_X, x);
        self.set(Self::FILL_Y, y);
        self
    }

    /// Expand bit on the main axis of `axis`.
    #[must_use]
    pub fn expands_main(self, axis: Axis) -> bool {
        let (x, y) = self.expand();
        axis.pair(x, y).0
    }

    /// Expand bit on the cross axis of `axis`.
    #[must_use]
    pub fn expands_cross(self, axis: Axis) -> bool {
        let (x, y) = self.expand();
        axis.pair(x, y).1
    }

    /// Fill bit on the main axis of `axis`.
    #[must_use]
    pub fn fills_main(self, axis: Axis) -> bool {
        let (x, y) = self.fill();
        axis.pair(x, y).0
    }

    /// Fill bit on the cross axis of `axis`.
    #[must_use]
    pub fn fills_cross(self, axis: Axis) -> bool {
        let (x, y) = self.fill();
        axis.pair(x, y).1
    }
}

/// Memo of in-tree policies for the duration of one layout pass.
///
/// A node expands (or fills) "in tree" on an axis if it or any descendant does.
/// Children can change between passes, so a cache lives only as long as the
/// pass that created it.
#[derive(Debug, Default)]
pub(crate) struct PolicyCache {
    memo: HashMap<NodeId, SizePolicy>,
}

impl PolicyCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Union of the policies of `id` and all of its descendants.
    pub(crate) fn in_tree<L>(&mut self, tree: &Tree<L>, id: NodeId) -> SizePolicy {
        if let Some(p) = self.memo.get(&id) {
            return *p;
        }
        let mut p = tree.policy(id).unwrap_or_default();
        for &child in tree.children_of(id) {
            p |= self.in_tree(tree, child);
        }
        self.memo.insert(id, p);
        p
    }
}
