// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena nodes of the hierarchy.

use crate::types::Aabb2D;

/// Stable index of a node slot in the tree's arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(usize);

impl NodeIdx {
    pub(crate) const fn new(i: usize) -> Self {
        Self(i)
    }

    pub(crate) const fn get(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Kind<K> {
    /// One registered object.
    Leaf(K),
    /// Exactly two children; no payload.
    Branch { left: NodeIdx, right: NodeIdx },
}

#[derive(Clone, Debug)]
pub(crate) struct Node<T, K> {
    pub(crate) aabb: Aabb2D<T>,
    pub(crate) parent: Option<NodeIdx>,
    pub(crate) kind: Kind<K>,
}

impl<T, K> Node<T, K> {
    pub(crate) fn leaf(aabb: Aabb2D<T>, id: K) -> Self {
        Self {
            aabb,
            parent: None,
            kind: Kind::Leaf(id),
        }
    }

    pub(crate) fn branch(
        aabb: Aabb2D<T>,
        parent: Option<NodeIdx>,
        left: NodeIdx,
        right: NodeIdx,
    ) -> Self {
        Self {
            aabb,
            parent,
            kind: Kind::Branch { left, right },
        }
    }

    pub(crate) fn children(&self) -> Option<(NodeIdx, NodeIdx)> {
        match self.kind {
            Kind::Branch { left, right } => Some((left, right)),
            Kind::Leaf(_) => None,
        }
    }

    /// The other child of a branch; `None` for leaves or if `child` is not a child.
    pub(crate) fn sibling_of(&self, child: NodeIdx) -> Option<NodeIdx> {
        let (left, right) = self.children()?;
        if left == child {
            Some(right)
        } else if right == child {
            Some(left)
        } else {
            None
        }
    }

    /// Point the child link that currently holds `old` at `new`. Returns false if `old` is not a child.
    pub(crate) fn replace_child(&mut self, old: NodeIdx, new: NodeIdx) -> bool {
        match &mut self.kind {
            Kind::Branch { left, .. } if *left == old => {
                *left = new;
                true
            }
            Kind::Branch { right, .. } if *right == old => {
                *right = new;
                true
            }
            _ => false,
        }
    }
}
