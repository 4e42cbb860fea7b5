// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: arena, insertion, removal, moves, queries.

use alloc::vec;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::config::{BvhOptions, TieBreak};
use crate::dump::Dump;
use crate::error::BvhError;
use crate::node::{Kind, Node, NodeIdx};
use crate::types::{Aabb2D, Scalar, growth, union_aabb};

/// How [`BvhTree::update`] applied a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MoveOutcome {
    /// The new box fits inside the leaf's parent box (or the leaf is the root);
    /// only the leaf's box was overwritten.
    InPlace,
    /// The leaf was detached and placed again from the root.
    Reinserted,
}

/// A dynamic bounding volume hierarchy keyed by object identifiers.
///
/// Every registered object is a leaf. Branches hold exactly two children and a
/// box enclosing both. The tree is maintained incrementally: there is no bulk
/// rebuild, and every operation only touches the path between the affected
/// leaf and the root.
#[derive(Clone)]
pub struct BvhTree<T: Scalar, K> {
    nodes: Vec<Option<Node<T, K>>>, // slots
    free_list: Vec<usize>,
    root: Option<NodeIdx>,
    index: HashMap<K, NodeIdx>,
    options: BvhOptions,
}

impl<T: Scalar, K: Eq + Hash + Clone> Default for BvhTree<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar, K> Debug for BvhTree<T, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = total - self.free_list.len();
        f.debug_struct("BvhTree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("objects", &self.index.len())
            .field("has_root", &self.root.is_some())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<T: Scalar, K: Eq + Hash + Clone> BvhTree<T, K> {
    /// Create an empty tree with default options.
    pub fn new() -> Self {
        Self::with_options(BvhOptions::default())
    }

    /// Create an empty tree with the given options.
    pub fn with_options(options: BvhOptions) -> Self {
        Self {
            nodes: Vec::new(),
            free_list: Vec::new(),
            root: None,
            index: HashMap::new(),
            options,
        }
    }

    /// The options this tree was created with.
    pub fn options(&self) -> BvhOptions {
        self.options
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True if no object is registered.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of live nodes (leaves and branches).
    ///
    /// A non-empty tree always has `2 * len() - 1` nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Whether `id` is registered.
    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(id)
    }

    /// The stored box of `id`, if registered.
    pub fn aabb<Q>(&self, id: &Q) -> Option<Aabb2D<T>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(id).map(|&leaf| self.node(leaf).aabb)
    }

    /// The box enclosing every registered object, or `None` when empty.
    pub fn root_aabb(&self) -> Option<Aabb2D<T>> {
        self.root.map(|r| self.node(r).aabb)
    }

    /// Height of the tree: 0 when empty, 1 for a lone leaf.
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut deepest = 0;
        let mut stack = vec![(root, 1_usize)];
        while let Some((i, d)) = stack.pop() {
            deepest = deepest.max(d);
            if let Some((left, right)) = self.node(i).children() {
                stack.push((left, d + 1));
                stack.push((right, d + 1));
            }
        }
        deepest
    }

    /// Register `id` with bounding box `aabb`.
    ///
    /// Returns `false` and leaves the tree untouched if `id` is already registered.
    pub fn insert(&mut self, aabb: Aabb2D<T>, id: K) -> bool {
        if self.index.contains_key(&id) {
            log::trace!("insert skipped: identifier already registered");
            return false;
        }
        debug_assert!(aabb.is_ordered(), "NaN coordinates are not supported");
        let leaf = self.alloc(Node::leaf(aabb, id.clone()));
        self.index.insert(id, leaf);
        self.place(leaf);
        true
    }

    /// Unregister `id` and return the box it had.
    pub fn remove<Q>(&mut self, id: &Q) -> Result<Aabb2D<T>, BvhError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let leaf = self.index.remove(id).ok_or(BvhError::NotFound)?;
        if self.root == Some(leaf) {
            let aabb = self.node(leaf).aabb;
            self.clear();
            return Ok(aabb);
        }
        self.unlink(leaf);
        Ok(self.release(leaf).aabb)
    }

    /// Move `id` to a new bounding box.
    ///
    /// If the new box still fits inside the leaf's parent box, only the leaf is
    /// overwritten and the ancestors keep their (possibly loose) boxes.
    /// Otherwise the leaf is detached and placed again as if newly inserted.
    pub fn update<Q>(&mut self, id: &Q, aabb: Aabb2D<T>) -> Result<MoveOutcome, BvhError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let leaf = *self.index.get(id).ok_or(BvhError::NotFound)?;
        debug_assert!(aabb.is_ordered(), "NaN coordinates are not supported");
        let fits = match self.node(leaf).parent {
            None => true,
            Some(parent) => self.node(parent).aabb.contains(&aabb),
        };
        if fits {
            self.node_mut(leaf).aabb = aabb;
            return Ok(MoveOutcome::InPlace);
        }
        log::trace!("leaf {} escaped its parent box; reinserting", leaf.get());
        self.unlink(leaf);
        self.node_mut(leaf).aabb = aabb;
        self.place(leaf);
        Ok(MoveOutcome::Reinserted)
    }

    /// Identifiers of every object whose box overlaps `aabb`, in no particular order.
    pub fn query_overlaps(&self, aabb: Aabb2D<T>) -> Vec<K> {
        let mut out = Vec::new();
        self.visit_overlaps(aabb, |id| out.push(id.clone()));
        out
    }

    /// Call `f` with every identifier whose box overlaps `aabb`.
    pub fn visit_overlaps(&self, aabb: Aabb2D<T>, f: impl FnMut(&K)) {
        self.visit(|b| b.overlaps(&aabb), f);
    }

    /// Identifiers of every object whose box contains the point.
    pub fn query_point(&self, x: T, y: T) -> Vec<K> {
        let mut out = Vec::new();
        self.visit(|b| b.contains_point(x, y), |id| out.push(id.clone()));
        out
    }

    /// Remove every object and release all nodes.
    ///
    /// Nodes are released bottom-up: a branch only after both of its children.
    pub fn clear(&mut self) {
        if let Some(root) = self.root.take() {
            let mut released = 0_usize;
            let mut stack = vec![(root, false)];
            while let Some((i, expanded)) = stack.pop() {
                match self.node(i).children() {
                    Some((left, right)) if !expanded => {
                        stack.push((i, true));
                        stack.push((left, false));
                        stack.push((right, false));
                    }
                    _ => {
                        self.release(i);
                        released += 1;
                    }
                }
            }
            log::debug!("cleared tree, released {released} nodes");
        }
        debug_assert_eq!(self.node_count(), 0, "every node is reachable from the root");
        self.nodes.clear();
        self.free_list.clear();
        self.index.clear();
    }

    /// A [`Display`](core::fmt::Display) adapter printing the tree structure.
    ///
    /// Pre-order, right subtree before left, two spaces of indent per level.
    pub fn dump(&self) -> Dump<'_, T, K> {
        Dump::new(self)
    }

    // --- internals ---

    pub(crate) fn root_idx(&self) -> Option<NodeIdx> {
        self.root
    }

    /// Access a node; panics if `i` does not refer to a live slot.
    pub(crate) fn node(&self, i: NodeIdx) -> &Node<T, K> {
        self.nodes[i.get()].as_ref().expect("dangling NodeIdx")
    }

    fn node_mut(&mut self, i: NodeIdx) -> &mut Node<T, K> {
        self.nodes[i.get()].as_mut().expect("dangling NodeIdx")
    }

    fn alloc(&mut self, node: Node<T, K>) -> NodeIdx {
        if let Some(i) = self.free_list.pop() {
            self.nodes[i] = Some(node);
            NodeIdx::new(i)
        } else {
            self.nodes.push(Some(node));
            NodeIdx::new(self.nodes.len() - 1)
        }
    }

    fn release(&mut self, i: NodeIdx) -> Node<T, K> {
        let node = self.nodes[i.get()].take().expect("dangling NodeIdx");
        self.free_list.push(i.get());
        node
    }

    /// Hang a detached leaf into the tree next to the best sibling.
    fn place(&mut self, leaf: NodeIdx) {
        match self.root {
            None => self.root = Some(leaf),
            Some(root) => {
                let aabb = self.node(leaf).aabb;
                let sibling = self.choose_sibling(root, &aabb);
                self.attach_beside(sibling, leaf);
            }
        }
    }

    /// Descend from `start` to the leaf whose subtree grows least when `aabb` is added.
    fn choose_sibling(&self, start: NodeIdx, aabb: &Aabb2D<T>) -> NodeIdx {
        let mut at = start;
        while let Some((left, right)) = self.node(at).children() {
            let grow_left = growth(&self.node(left).aabb, aabb);
            let grow_right = growth(&self.node(right).aabb, aabb);
            at = match self.options.tie_break {
                TieBreak::Right => {
                    if grow_left < grow_right {
                        left
                    } else {
                        right
                    }
                }
                TieBreak::Left => {
                    if grow_right < grow_left {
                        right
                    } else {
                        left
                    }
                }
            };
        }
        at
    }

    /// Replace `sibling` with a new branch holding `leaf` (left) and `sibling` (right).
    fn attach_beside(&mut self, sibling: NodeIdx, leaf: NodeIdx) {
        let parent = self.node(sibling).parent;
        let aabb = union_aabb(self.node(sibling).aabb, self.node(leaf).aabb);
        let branch = self.alloc(Node::branch(aabb, parent, leaf, sibling));
        self.node_mut(sibling).parent = Some(branch);
        self.node_mut(leaf).parent = Some(branch);
        log::trace!(
            "paired leaf {} with sibling {} under branch {}",
            leaf.get(),
            sibling.get(),
            branch.get()
        );
        match parent {
            Some(p) => {
                let linked = self.node_mut(p).replace_child(sibling, branch);
                debug_assert!(linked, "sibling must be a child of its parent");
                self.refit_grow(branch);
            }
            None => self.root = Some(branch),
        }
    }

    /// Grow ancestors of `child` until one already covers it.
    ///
    /// Every ancestor contains its children, so once one is covered all higher ones are too.
    fn refit_grow(&mut self, mut child: NodeIdx) {
        while let Some(parent) = self.node(child).parent {
            let child_box = self.node(child).aabb;
            let p = self.node_mut(parent);
            if p.aabb.contains(&child_box) {
                break;
            }
            p.aabb = union_aabb(p.aabb, child_box);
            child = parent;
        }
    }

    /// Recompute `from` and every ancestor as the exact union of its children.
    fn refit_exact(&mut self, from: NodeIdx) {
        let mut at = Some(from);
        while let Some(i) = at {
            let Some((left, right)) = self.node(i).children() else {
                break;
            };
            let exact = union_aabb(self.node(left).aabb, self.node(right).aabb);
            let n = self.node_mut(i);
            n.aabb = exact;
            at = n.parent;
        }
    }

    /// Detach a non-root leaf: its sibling takes the parent's place and the parent is released.
    ///
    /// The leaf stays allocated with no parent; the caller releases or re-places it.
    fn unlink(&mut self, leaf: NodeIdx) {
        let Some(parent) = self.node(leaf).parent else {
            self.root = None;
            return;
        };
        let sibling = self
            .node(parent)
            .sibling_of(leaf)
            .expect("leaf must be a child of its parent");
        let grandparent = self.release(parent).parent;
        self.node_mut(sibling).parent = grandparent;
        self.node_mut(leaf).parent = None;
        match grandparent {
            Some(gp) => {
                let linked = self.node_mut(gp).replace_child(parent, sibling);
                debug_assert!(linked, "parent must be a child of the grandparent");
                self.refit_exact(gp);
            }
            None => {
                log::debug!("promoted node {} to root", sibling.get());
                self.root = Some(sibling);
            }
        }
    }

    /// Depth-first walk calling `f` for leaves whose box satisfies `hit`.
    ///
    /// `hit` must be monotone under containment (if it holds for a box, it holds for
    /// every enclosing box), so branches that fail it can be skipped.
    fn visit(&self, hit: impl Fn(&Aabb2D<T>) -> bool, mut f: impl FnMut(&K)) {
        let Some(root) = self.root else {
            return;
        };
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            let n = self.node(i);
            match &n.kind {
                Kind::Leaf(id) => {
                    if hit(&n.aabb) {
                        f(id);
                    }
                }
                Kind::Branch { left, right } => {
                    if self.options.prune_queries && !hit(&n.aabb) {
                        continue;
                    }
                    stack.push(*left);
                    stack.push(*right);
                }
            }
        }
    }

    /// Panic unless every structural invariant holds.
    ///
    /// With `exact`, branch boxes must equal the union of their children instead of
    /// merely containing it.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self, exact: bool) {
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        assert_eq!(alive, self.node_count(), "free list matches empty slots");
        for &i in &self.free_list {
            assert!(self.nodes[i].is_none(), "free slot {i} must be empty");
        }
        let Some(root) = self.root else {
            assert_eq!(alive, 0, "empty tree has no live nodes");
            assert!(self.index.is_empty(), "empty tree has an empty index");
            return;
        };
        assert!(self.node(root).parent.is_none(), "root has no parent");
        let mut leaves = 0;
        let mut reached = 0;
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            reached += 1;
            let n = self.node(i);
            match &n.kind {
                Kind::Leaf(id) => {
                    leaves += 1;
                    assert_eq!(self.index.get(id), Some(&i), "index points at leaf");
                }
                Kind::Branch { left, right } => {
                    assert_ne!(left, right, "children are distinct");
                    for c in [*left, *right] {
                        assert_eq!(self.node(c).parent, Some(i), "child links back to parent");
                    }
                    let union = union_aabb(self.node(*left).aabb, self.node(*right).aabb);
                    if exact {
                        assert_eq!(n.aabb, union, "branch box is the exact union");
                    } else {
                        assert!(n.aabb.contains(&union), "branch box covers its children");
                    }
                    stack.push(*left);
                    stack.push(*right);
                }
            }
        }
        assert_eq!(reached, alive, "every live node is reachable from the root");
        assert_eq!(leaves, self.index.len(), "one leaf per registered id");
        assert_eq!(alive, 2 * leaves - 1, "strict binary tree");
    }
}

impl<T: Scalar, K: Eq + Hash + Clone> FromIterator<(Aabb2D<T>, K)> for BvhTree<T, K> {
    fn from_iter<I: IntoIterator<Item = (Aabb2D<T>, K)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Scalar, K: Eq + Hash + Clone> Extend<(Aabb2D<T>, K)> for BvhTree<T, K> {
    fn extend<I: IntoIterator<Item = (Aabb2D<T>, K)>>(&mut self, iter: I) {
        for (aabb, id) in iter {
            self.insert(aabb, id);
        }
    }
}

// Convenience type aliases for common scalar choices.

/// Tree with f32 coordinates and f64 metrics.
pub type BvhTreeF32<K> = BvhTree<f32, K>;

/// Tree with f64 coordinates and f64 metrics.
pub type BvhTreeF64<K> = BvhTree<f64, K>;

/// Tree with i64 coordinates and i128 metrics.
pub type BvhTreeI64<K> = BvhTree<i64, K>;
