// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree configuration.

/// Which child insertion descends into when both would grow by the same area.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TieBreak {
    /// Descend into the left child on equal growth.
    Left,
    /// Descend into the right child on equal growth.
    #[default]
    Right,
}

/// Options for a [`BvhTree`](crate::BvhTree).
///
/// ```
/// use understory_bvh::{BvhOptions, BvhTree, TieBreak};
///
/// let tree: BvhTree<f64, u32> = BvhTree::with_options(BvhOptions {
///     tie_break: TieBreak::Left,
///     ..Default::default()
/// });
/// assert!(tree.options().prune_queries);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BvhOptions {
    /// Tie-break used by the insertion heuristic.
    pub tie_break: TieBreak,
    /// Skip subtrees whose bounding box misses the query.
    ///
    /// Disabling this visits every node on each query. Results are identical either way.
    pub prune_queries: bool,
}

impl Default for BvhOptions {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::Right,
            prune_queries: true,
        }
    }
}
