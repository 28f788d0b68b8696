// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred layout and paint marks.

bitflags::bitflags! {
    /// Work a node is waiting for.
    ///
    /// Setters only record marks; the host drains them once per tick via
    /// [`Tree::layout_if_needed`](crate::Tree::layout_if_needed) and
    /// [`Tree::drain_paint`](crate::Tree::drain_paint).
    /// Ancestors of a marked node carry the `CHILD_*` variant so that a drain
    /// can skip clean subtrees.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Invalidation: u8 {
        /// The node's geometry must be recomputed.
        const NEEDS_LAYOUT       = 0b0000_0001;
        /// The node must be repainted.
        const NEEDS_PAINT        = 0b0000_0010;
        /// Some descendant needs layout.
        const CHILD_NEEDS_LAYOUT = 0b0000_0100;
        /// Some descendant needs paint.
        const CHILD_NEEDS_PAINT  = 0b0000_1000;
    }
}

impl Invalidation {
    /// Both own marks.
    pub const LAYOUT_AND_PAINT: Self = Self::NEEDS_LAYOUT.union(Self::NEEDS_PAINT);

    /// Returns `true` if the node or a descendant needs layout.
    #[must_use]
    pub const fn needs_layout(self) -> bool {
        self.intersects(Self::NEEDS_LAYOUT.union(Self::CHILD_NEEDS_LAYOUT))
    }

    /// Returns `true` if the node or a descendant needs paint.
    #[must_use]
    pub const fn needs_paint(self) -> bool {
        self.intersects(Self::NEEDS_PAINT.union(Self::CHILD_NEEDS_PAINT))
    }

    /// The marks an ancestor receives when a descendant gets `self`.
    #[must_use]
    pub(crate) const fn for_ancestors(self) -> Self {
        let mut out = Self::empty();
        if self.needs_layout() {
            out = out.union(Self::CHILD_NEEDS_LAYOUT);
        }
        if self.needs_paint() {
            out = out.union(Self::CHILD_NEEDS_PAINT);
        }
        out
    }
}
