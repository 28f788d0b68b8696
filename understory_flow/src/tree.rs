// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-backed node tree.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::flow::FlowLayout;
use crate::geometry::{Rect, Size};
use crate::invalidation::Invalidation;
use crate::policy::{PolicyCache, SizePolicy};

/// Identifier for a node in a [`Tree`].
///
/// A slot index plus a generation counter. Removing a node frees its slot;
/// reusing the slot bumps the generation, so stale ids never alias a new node.
/// Use [`Tree::is_alive`] to check liveness.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(u32, u32);

impl NodeId {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Errors from structural tree operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The id refers to a removed node, or its slot was reused.
    #[error("node {0:?} is not alive")]
    StaleNode(NodeId),
}

/// Host content placed at a leaf of the tree.
///
/// Leaves are measured by their parent container and told their final bounds
/// once allocation is done. Leaves that change on their own (for example a
/// text widget whose content was edited) report that through
/// [`Leaf::take_invalidation`]; the tree pulls it after every
/// [`Tree::update_leaf`] call. After the leaf is laid out, only the paint
/// part of what it reports is kept.
pub trait Leaf {
    /// Natural size given the space available.
    ///
    /// Must not assume that `hint` will become the final size.
    fn measure(&mut self, hint: Size) -> Size;

    /// Receives the final bounds assigned by layout.
    fn layout(&mut self, bounds: Rect) {
        let _ = bounds;
    }

    /// Returns and clears the marks raised since the last call.
    fn take_invalidation(&mut self) -> Invalidation {
        Invalidation::empty()
    }
}

impl Leaf for () {
    fn measure(&mut self, _hint: Size) -> Size {
        Size::ZERO
    }
}

/// What a node is, as far as layout is concerned.
#[derive(Clone, Debug)]
pub enum NodeKind<L> {
    /// Container that arranges its children with the flow algorithm.
    Flow(FlowLayout),
    /// Node with a constant natural size, clamped to the hint when measured.
    Fixed(Size),
    /// Host content.
    Leaf(L),
}

#[derive(Debug)]
struct Node<L> {
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    bounds: Rect,
    policy: SizePolicy,
    invalidation: Invalidation,
    kind: NodeKind<L>,
}

#[derive(Debug)]
struct Slot<L> {
    generation: u32,
    node: Option<Node<L>>,
}

/// Tree of layoutable nodes.
///
/// Parents own their children as an ordered list; the parent link stored on a
/// child is a plain id used for upward traversal only. Removing a node removes
/// its whole subtree.
///
/// ```rust
/// use understory_flow::{FlowLayout, NodeKind, Rect, Size, SizePolicy, Tree};
///
/// let mut tree = Tree::<()>::new();
/// let row = tree.insert(None, NodeKind::Flow(FlowLayout::horizontal())).unwrap();
/// let label = tree.insert(Some(row), NodeKind::Fixed(Size::new(100, 20))).unwrap();
/// let body = tree.insert(Some(row), NodeKind::Fixed(Size::new(0, 20))).unwrap();
/// tree.set_policy(body, SizePolicy::EXPAND_X | SizePolicy::FILL_X).unwrap();
///
/// tree.layout(row, Rect::new(0, 0, 300, 20));
/// assert_eq!(tree.bounds(label), Some(Rect::new(0, 0, 100, 20)));
/// assert_eq!(tree.bounds(body), Some(Rect::new(100, 0, 300, 20)));
/// ```
#[derive(Debug)]
pub struct Tree<L = ()> {
    slots: Vec<Slot<L>>,
    free: Vec<u32>,
    live: usize,
}

impl<L> Default for Tree<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> Tree<L> {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if the tree has no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Returns `true` if `id` refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    fn node(&self, id: NodeId) -> Option<&Node<L>> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<L>> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_mut()
    }

    fn live_node_mut(&mut self, id: NodeId) -> Result<&mut Node<L>, TreeError> {
        self.node_mut(id).ok_or(TreeError::StaleNode(id))
    }

    /// Inserts a node as the last child of `parent`, or as a root.
    ///
    /// The new node starts with an empty policy and zero bounds, and is marked
    /// for layout and paint.
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        kind: NodeKind<L>,
    ) -> Result<NodeId, TreeError> {
        if let Some(p) = parent {
            if !self.is_alive(p) {
                return Err(TreeError::StaleNode(p));
            }
        }
        let node = Node {
            parent,
            children: SmallVec::new(),
            bounds: Rect::ZERO,
            policy: SizePolicy::empty(),
            invalidation: Invalidation::empty(),
            kind,
        };
        let id = if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.node = Some(node);
            NodeId::new(idx, slot.generation)
        } else {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "more than u32::MAX live nodes is not supported"
            )]
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                node: Some(node),
            });
            NodeId::new(idx, 1)
        };
        self.live += 1;
        if let Some(p) = parent {
            self.live_node_mut(p)?.children.push(id);
        }
        self.mark(id, Invalidation::LAYOUT_AND_PAINT);
        Ok(id)
    }

    /// Removes `id` and its whole subtree.
    ///
    /// The former parent is marked for layout and paint.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        let parent = self.node(id).ok_or(TreeError::StaleNode(id))?.parent;
        if let Some(p) = parent {
            if let Some(pn) = self.node_mut(p) {
                pn.children.retain(|c| *c != id);
            }
            self.mark(p, Invalidation::LAYOUT_AND_PAINT);
        }
        let mut stack: Vec<NodeId> = Vec::new();
        stack.push(id);
        while let Some(n) = stack.pop() {
            let slot = &mut self.slots[n.idx()];
            if let Some(node) = slot.node.take() {
                stack.extend(node.children.iter().copied());
                self.free.push(n.0);
                self.live -= 1;
            }
        }
        Ok(())
    }

    /// Parent of `id`, if any.
    #[must_use]
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Children of `id` in layout order. Empty for stale ids.
    #[must_use]
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Current bounds of `id`.
    #[must_use]
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        Some(self.node(id)?.bounds)
    }

    /// Assigns bounds directly.
    ///
    /// Intended for roots; layout overwrites the bounds of every other node.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) -> Result<(), TreeError> {
        let node = self.live_node_mut(id)?;
        if node.bounds != bounds {
            node.bounds = bounds;
            self.mark(id, Invalidation::LAYOUT_AND_PAINT);
        }
        Ok(())
    }

    /// Own sizing policy of `id`.
    #[must_use]
    pub fn policy(&self, id: NodeId) -> Option<SizePolicy> {
        Some(self.node(id)?.policy)
    }

    /// Replaces the sizing policy of `id`.
    pub fn set_policy(&mut self, id: NodeId, policy: SizePolicy) -> Result<(), TreeError> {
        let node = self.live_node_mut(id)?;
        if node.policy != policy {
            node.policy = policy;
            self.mark_parent_layout(id);
        }
        Ok(())
    }

    /// Sets the `(x, y)` expand bits of `id`.
    pub fn set_expand(&mut self, id: NodeId, x: bool, y: bool) -> Result<(), TreeError> {
        let p = self.policy(id).ok_or(TreeError::StaleNode(id))?;
        self.set_policy(id, p.with_expand(x, y))
    }

    /// Sets the `(x, y)` fill bits of `id`.
    pub fn set_fill(&mut self, id: NodeId, x: bool, y: bool) -> Result<(), TreeError> {
        let p = self.policy(id).ok_or(TreeError::StaleNode(id))?;
        self.set_policy(id, p.with_fill(x, y))
    }

    /// Own `(x, y)` expand bits of `id`.
    #[must_use]
    pub fn expand(&self, id: NodeId) -> Option<(bool, bool)> {
        Some(self.node(id)?.policy.expand())
    }

    /// Own `(x, y)` fill bits of `id`.
    #[must_use]
    pub fn fill(&self, id: NodeId) -> Option<(bool, bool)> {
        Some(self.node(id)?.policy.fill())
    }

    /// Union of the policies of `id` and its descendants.
    ///
    /// Computed on demand; layout uses a per-pass memo instead.
    #[must_use]
    pub fn policy_in_tree(&self, id: NodeId) -> Option<SizePolicy> {
        self.is_alive(id).then(|| PolicyCache::new().in_tree(self, id))
    }

    /// Kind of `id`.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind<L>> {
        Some(&self.node(id)?.kind)
    }

    /// Replaces the kind of `id` and marks it for layout and paint.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind<L>) -> Result<(), TreeError> {
        self.live_node_mut(id)?.kind = kind;
        self.mark(id, Invalidation::LAYOUT_AND_PAINT);
        self.mark_parent_layout(id);
        Ok(())
    }

    /// Leaf content of `id`, if it is a leaf.
    #[must_use]
    pub fn leaf(&self, id: NodeId) -> Option<&L> {
        match &self.node(id)?.kind {
            NodeKind::Leaf(l) => Some(l),
            _ => None,
        }
    }

    /// Current marks of `id`.
    #[must_use]
    pub fn invalidation(&self, id: NodeId) -> Option<Invalidation> {
        Some(self.node(id)?.invalidation)
    }

    /// Adds marks to `id` and the matching `CHILD_*` marks to its ancestors.
    ///
    /// A node that needs layout may change size, so its parent is marked for
    /// layout too.
    pub fn mark(&mut self, id: NodeId, marks: Invalidation) {
        if marks.is_empty() {
            return;
        }
        let Some(node) = self.node_mut(id) else {
            return;
        };
        node.invalidation |= marks;
        let up = marks.for_ancestors();
        let mut cur = node.parent;
        if marks.contains(Invalidation::NEEDS_LAYOUT) {
            if let Some(p) = cur {
                if let Some(pn) = self.node_mut(p) {
                    pn.invalidation |= Invalidation::NEEDS_LAYOUT;
                }
            }
        }
        while let Some(p) = cur {
            let Some(pn) = self.node_mut(p) else {
                break;
            };
            if pn.invalidation.contains(up) {
                // Ancestors above already carry these marks.
                break;
            }
            pn.invalidation |= up;
            cur = pn.parent;
        }
    }

    fn mark_parent_layout(&mut self, id: NodeId) {
        if let Some(p) = self.parent_of(id) {
            self.mark(p, Invalidation::NEEDS_LAYOUT);
        }
    }

    /// Visits every node under `root` that needs paint, parents first.
    ///
    /// Paint marks (own and `CHILD_*`) are cleared on the way; clean subtrees
    /// are skipped. Returns the number of visited nodes.
    pub fn drain_paint<F>(&mut self, root: NodeId, mut f: F) -> usize
    where
        F: FnMut(NodeId, Rect, &NodeKind<L>),
    {
        let mut painted = 0;
        let mut stack: Vec<NodeId> = Vec::new();
        stack.push(root);
        while let Some(id) = stack.pop() {
            let Some(node) = self.node_mut(id) else {
                continue;
            };
            let marks = node.invalidation;
            node.invalidation.remove(Invalidation::NEEDS_PAINT | Invalidation::CHILD_NEEDS_PAINT);
            if marks.contains(Invalidation::NEEDS_PAINT) {
                f(id, node.bounds, &node.kind);
                painted += 1;
            }
            if marks.needs_paint() {
                // Reverse so that the first child is visited first.
                stack.extend(node.children.iter().rev().copied());
            }
        }
        painted
    }

    pub(crate) fn clear_layout_marks(&mut self, root: NodeId) {
        let mut stack: Vec<NodeId> = Vec::new();
        stack.push(root);
        while let Some(id) = stack.pop() {
            let Some(node) = self.node_mut(id) else {
                continue;
            };
            if !node.invalidation.needs_layout() {
                continue;
            }
            node.invalidation.remove(Invalidation::NEEDS_LAYOUT | Invalidation::CHILD_NEEDS_LAYOUT);
            stack.extend(node.children.iter().copied());
        }
    }

    pub(crate) fn node_bounds_and_kind_mut(
        &mut self,
        id: NodeId,
    ) -> Option<(Rect, &mut NodeKind<L>)> {
        let node = self.node_mut(id)?;
        Some((node.bounds, &mut node.kind))
    }

    /// Writes layout-assigned bounds, marking paint when they change.
    pub(crate) fn assign_bounds(&mut self, id: NodeId, bounds: Rect) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if node.bounds != bounds {
            node.bounds = bounds;
            self.mark(id, Invalidation::NEEDS_PAINT);
        }
    }
}

impl<L: Leaf> Tree<L> {
    /// Runs `f` on the leaf content of `id` and records the marks it raised.
    ///
    /// This is the mutation path for leaves: any invalidation reported by
    /// [`Leaf::take_invalidation`] afterwards is applied to the node.
    /// Returns `None` if `id` is stale or not a leaf.
    pub fn update_leaf<R>(&mut self, id: NodeId, f: impl FnOnce(&mut L) -> R) -> Option<R> {
        let NodeKind::Leaf(leaf) = &mut self.node_mut(id)?.kind else {
            return None;
        };
        let out = f(leaf);
        self.pull_leaf_marks(id);
        Some(out)
    }

    fn pull_leaf_marks(&mut self, id: NodeId) {
        let marks = match self.node_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Leaf(leaf)) => leaf.take_invalidation(),
            _ => return,
        };
        if !marks.is_empty() {
            tracing::trace!(?id, ?marks, "leaf raised marks");
            self.mark(id, marks);
        }
    }
}
