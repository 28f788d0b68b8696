// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The flow layout engine.
//!
//! A flow container lines its children up along its main axis. Measuring
//! gives non-expanding children their natural size first and splits what is
//! left evenly among children that expand on the main axis. Allocation repeats
//! the measurement against the container's bounds, spreads any space still
//! unused evenly among filling children, and places everyone back to back.
//!
//! Even splits use integer division and drop the remainder. When the last
//! child fills on the main axis, its trailing edge is snapped to the
//! container's edge, which absorbs the remainder in the common case.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::axis::Axis;
use crate::geometry::{Rect, Size};
use crate::invalidation::Invalidation;
use crate::policy::PolicyCache;
use crate::tree::{Leaf, NodeId, NodeKind, Tree};

/// Configuration of a flow container.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FlowLayout {
    /// Lay children out top to bottom instead of left to right.
    pub vertical: bool,
}

impl FlowLayout {
    /// Left-to-right flow.
    #[must_use]
    pub const fn horizontal() -> Self {
        Self { vertical: false }
    }

    /// Top-to-bottom flow.
    #[must_use]
    pub const fn vertical() -> Self {
        Self { vertical: true }
    }

    /// Axis translator for this container.
    #[must_use]
    pub const fn axis(self) -> Axis {
        Axis::new(self.vertical)
    }
}

type Children = SmallVec<[NodeId; 8]>;

impl<L: Leaf> Tree<L> {
    /// Natural size of `id` given an available-size hint.
    ///
    /// Does not write any bounds. Returns [`Size::ZERO`] for stale ids.
    pub fn measure(&mut self, id: NodeId, hint: Size) -> Size {
        let mut cache = PolicyCache::new();
        self.measure_with(id, hint, &mut cache)
    }

    fn measure_with(&mut self, id: NodeId, hint: Size, cache: &mut PolicyCache) -> Size {
        let layout = match self.kind_mut(id) {
            None => return Size::ZERO,
            Some(NodeKind::Fixed(size)) => return size.min(hint),
            Some(NodeKind::Leaf(leaf)) => return leaf.measure(hint).min(hint),
            Some(NodeKind::Flow(layout)) => *layout,
        };
        let axis = layout.axis();
        let sizes = self.measure_childs_sizes(id, axis, hint, cache);
        let mut total = Size::ZERO;
        for s in sizes {
            total.width += s.width;
            total.height = total.height.max(s.height);
        }
        axis.size(total)
    }

    /// Per-child sizes in main/cross space (`width` is the main extent).
    fn measure_childs_sizes(
        &mut self,
        id: NodeId,
        axis: Axis,
        hint: Size,
        cache: &mut PolicyCache,
    ) -> Vec<Size> {
        let children: Children = self.children_of(id).iter().copied().collect();
        let max = axis.size(hint);
        let mut sizes: Vec<Option<Size>> = alloc::vec![None; children.len()];

        // Children that do not expand on the main axis take what they need.
        let mut budget = max;
        let mut n_expand: i32 = 0;
        for (slot, &child) in sizes.iter_mut().zip(&children) {
            let policy = cache.in_tree(self, child);
            if policy.expands_main(axis) {
                n_expand += 1;
                continue;
            }
            let mut m = axis.size(self.measure_with(child, axis.size(budget), cache));
            if policy.expands_cross(axis) {
                m.height = max.height;
            }
            budget.width = (budget.width - m.width).max(0);
            tracing::trace!(?child, ?m, "measured fixed-main child");
            *slot = Some(m);
        }

        // The rest is split evenly; the remainder is left unallocated.
        let share = if n_expand > 0 { budget.width / n_expand } else { 0 };
        for (slot, &child) in sizes.iter_mut().zip(&children) {
            if slot.is_some() {
                continue;
            }
            let policy = cache.in_tree(self, child);
            let m = if policy.expands_cross(axis) {
                Size::new(share, max.height)
            } else {
                let hint = axis.size(Size::new(share, max.height));
                let m = axis.size(self.measure_with(child, hint, cache));
                Size::new(share, m.height)
            };
            tracing::trace!(?child, ?m, share, "measured expanding child");
            *slot = Some(m);
        }

        sizes.into_iter().map(Option::unwrap_or_default).collect()
    }

    /// Assigns bounds to the children of `id`, then recurses into them.
    ///
    /// The bounds of `id` itself must already be final. For a leaf this
    /// forwards its bounds to [`Leaf::layout`] instead.
    pub fn calc_childs_bounds(&mut self, id: NodeId) {
        let mut cache = PolicyCache::new();
        self.calc_childs_bounds_with(id, &mut cache);
    }

    fn calc_childs_bounds_with(&mut self, id: NodeId, cache: &mut PolicyCache) {
        let Some((bounds, kind)) = self.node_bounds_and_kind_mut(id) else {
            return;
        };
        let layout = match kind {
            NodeKind::Fixed(_) => return,
            NodeKind::Leaf(leaf) => {
                leaf.layout(bounds);
                // The leaf was just laid out; only paint is still owed.
                let marks = leaf.take_invalidation() & Invalidation::NEEDS_PAINT;
                self.mark(id, marks);
                return;
            }
            NodeKind::Flow(layout) => *layout,
        };
        let axis = layout.axis();
        let children: Children = self.children_of(id).iter().copied().collect();
        let mut sizes = self.measure_childs_sizes(id, axis, bounds.size(), cache);
        let abounds = axis.rect(bounds);

        // Hand the space nobody measured for to the children that fill.
        let n_fill = children
            .iter()
            .filter(|&&c| cache.in_tree(self, c).fills_main(axis))
            .count();
        if n_fill > 0 {
            let used: i32 = sizes.iter().map(|s| s.width).sum();
            let available = abounds.dx() - used;
            if available > 0 {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "child counts are far below i32::MAX"
                )]
                let share = available / n_fill as i32;
                for (size, &child) in sizes.iter_mut().zip(&children) {
                    if cache.in_tree(self, child).fills_main(axis) {
                        size.width += share;
                    }
                }
            }
        }

        let last = children.last().copied();
        let mut cursor = abounds.min.x;
        for (mut size, &child) in sizes.into_iter().zip(&children) {
            let policy = cache.in_tree(self, child);
            if policy.fills_cross(axis) {
                size.height = abounds.dy();
            }
            let end = cursor + size.width;
            let mut r = Rect::new(cursor, abounds.min.y, end, abounds.min.y + size.height);
            cursor = end;

            // Absorb rounding loss from the even splits.
            if Some(child) == last && policy.fills_main(axis) {
                r.max.x = abounds.max.x;
            }

            let r = axis.rect(r).intersect(bounds);
            tracing::trace!(?child, bounds = ?r, "placed child");
            self.assign_bounds(child, r);
            self.calc_childs_bounds_with(child, cache);
        }
    }

    /// Sets the bounds of `root` and lays out its whole subtree.
    ///
    /// Clears layout marks under `root`; nodes whose bounds change are marked
    /// for paint.
    pub fn layout(&mut self, root: NodeId, bounds: Rect) {
        if !self.is_alive(root) {
            return;
        }
        tracing::debug!(?root, ?bounds, nodes = self.len(), "flow layout pass");
        self.clear_layout_marks(root);
        self.assign_bounds(root, bounds);
        self.calc_childs_bounds(root);
    }

    /// Runs [`Tree::layout`] if `bounds` changed or anything under `root`
    /// needs layout. Returns `true` if a pass ran.
    pub fn layout_if_needed(&mut self, root: NodeId, bounds: Rect) -> bool {
        let (Some(current), Some(marks)) = (self.bounds(root), self.invalidation(root)) else {
            return false;
        };
        if current == bounds && !marks.needs_layout() {
            tracing::debug!(?root, "layout up to date");
            return false;
        }
        self.layout(root, bounds);
        true
    }

    fn kind_mut(&mut self, id: NodeId) -> Option<&mut NodeKind<L>> {
        self.node_bounds_and_kind_mut(id).map(|(_, kind)| kind)
    }
}
