// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable tree dump for debugging.

use alloc::vec;
use core::fmt::{self, Display};

use crate::node::Kind;
use crate::tree::BvhTree;
use crate::types::Scalar;

/// [`Display`] adapter returned by [`BvhTree::dump`].
///
/// Each node is printed on its own line, indented two spaces per level.
/// Branches print before their children, right child first:
///
/// ```text
/// + branch || [0, 0] - [6, 6]
///   - R - leaf: A || [0, 0] - [1, 1]
///   - L - leaf: B || [5, 5] - [6, 6]
/// ```
pub struct Dump<'a, T: Scalar, K> {
    tree: &'a BvhTree<T, K>,
}

impl<'a, T: Scalar, K> Dump<'a, T, K> {
    pub(crate) fn new(tree: &'a BvhTree<T, K>) -> Self {
        Self { tree }
    }
}

impl<T: Scalar, K> fmt::Debug for Dump<'_, T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dump").finish_non_exhaustive()
    }
}

impl<T, K> Display for Dump<'_, T, K>
where
    T: Scalar + Display,
    K: Eq + core::hash::Hash + Clone + Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.tree.root_idx() else {
            return Ok(());
        };
        let mut stack = vec![(root, 0_usize)];
        while let Some((i, level)) = stack.pop() {
            let node = self.tree.node(i);
            for _ in 0..level {
                f.write_str("  ")?;
            }
            match &node.kind {
                Kind::Branch { left, right } => {
                    writeln!(f, "+ branch || {}", node.aabb)?;
                    // Popped right first.
                    stack.push((*left, level + 1));
                    stack.push((*right, level + 1));
                }
                Kind::Leaf(id) => {
                    f.write_str("- ")?;
                    if let Some(parent) = node.parent {
                        let side = match self.tree.node(parent).kind {
                            Kind::Branch { right, .. } if right == i => "R",
                            _ => "L",
                        };
                        write!(f, "{side} - ")?;
                    }
                    writeln!(f, "leaf: {id} || {}", node.aabb)?;
                }
            }
        }
        Ok(())
    }
}
