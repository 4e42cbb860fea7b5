// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_bvh --heading-base-level=0

//! Understory BVH: a dynamic 2D bounding volume hierarchy.
//!
//! Understory BVH answers "which registered objects overlap this region?" for
//! sets of objects that are inserted, moved, and removed every frame, such as the
//! broad phase of a collision system.
//!
//! - Register, move, and unregister axis-aligned bounding boxes (AABBs) by identifier.
//! - Query by intersecting rectangle or by point.
//! - The hierarchy is maintained incrementally; there is no rebuild step.
//!
//! It is generic over the scalar type `T` (`f32`, `f64`, `i64`) and over the
//! identifier type `K` (anything `Eq + Hash + Clone`).
//!
//! # Example
//!
//! ```rust
//! use understory_bvh::{Aabb2D, BvhTree, MoveOutcome};
//!
//! let mut tree: BvhTree<f64, &str> = BvhTree::new();
//! tree.insert(Aabb2D::new(0.0, 0.0, 1.0, 1.0), "a");
//! tree.insert(Aabb2D::new(5.0, 5.0, 6.0, 6.0), "b");
//! tree.insert(Aabb2D::new(0.5, 0.5, 1.5, 1.5), "c");
//!
//! let mut hits = tree.query_overlaps(Aabb2D::new(0.0, 0.0, 2.0, 2.0));
//! hits.sort();
//! assert_eq!(hits, ["a", "c"]);
//!
//! // A move that leaves the parent box forces a reinsert.
//! let outcome = tree.update("b", Aabb2D::new(50.0, 50.0, 51.0, 51.0)).unwrap();
//! assert_eq!(outcome, MoveOutcome::Reinserted);
//!
//! tree.remove("a").unwrap();
//! assert_eq!(tree.query_point(1.2, 1.2), ["c"]);
//! ```
//!
//! ## How it works
//!
//! - Insertion walks down from the root, at each branch picking the child whose
//!   box grows least (by area) when the new box is added, until it reaches a
//!   leaf. That leaf and the new one become the two children of a new branch.
//!   Ancestors are grown until one already covers the new branch.
//! - Removal promotes the removed leaf's sibling into its parent's place and
//!   recomputes ancestor boxes exactly.
//! - A move whose new box still fits inside the leaf's parent box only overwrites
//!   the leaf. Larger moves detach the leaf and place it again.
//! - Queries skip branches whose box misses the query rectangle
//!   (see [`BvhOptions::prune_queries`]).
//!
//! Area comparisons use widened accumulators (f32→f64, f64→f64, i64→i128).
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates. Debug builds assert.
//! Bounds are closed: boxes that touch along an edge overlap.
//!
//! ## Features
//!
//! - `kurbo`: conversions between [`Aabb2D<f64>`] and `kurbo::Rect`.
//!
//! ## Logging
//!
//! Structural events are reported through the [`log`] facade at `debug` and
//! `trace` level. No logger is installed by this crate.

#![no_std]

extern crate alloc;

pub mod config;
pub mod dump;
pub mod error;
pub(crate) mod node;
pub mod tree;
pub mod types;

pub use config::{BvhOptions, TieBreak};
pub use dump::Dump;
pub use error::BvhError;
pub use tree::{BvhTree, BvhTreeF32, BvhTreeF64, BvhTreeI64, MoveOutcome};
pub use types::{Aabb2D, Scalar};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn insert_move_query_remove() {
        let mut tree: BvhTreeI64<u32> = BvhTree::new();
        assert!(tree.insert(Aabb2D::new(0, 0, 10, 10), 1));
        assert!(tree.insert(Aabb2D::new(20, 0, 30, 10), 2));
        assert_eq!(tree.update(&1, Aabb2D::new(1, 1, 9, 9)), Ok(MoveOutcome::InPlace));

        let hits: Vec<_> = tree.query_point(5, 5);
        assert_eq!(hits, [1]);

        assert_eq!(tree.remove(&1), Ok(Aabb2D::new(1, 1, 9, 9)));
        assert!(tree.query_point(5, 5).is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn every_object_overlaps_its_own_box() {
        let boxes: Vec<Aabb2D<f32>> = (0..40)
            .map(|i| {
                let f = i as f32;
                Aabb2D::<f32>::from_xywh(f * 7.5 % 100.0, f * 3.25 % 60.0, 4.0, 4.0)
            })
            .collect();
        let tree: BvhTreeF32<usize> = boxes.iter().copied().zip(0..).collect();
        assert_eq!(tree.len(), boxes.len());
        for (id, aabb) in boxes.iter().enumerate() {
            assert!(tree.query_overlaps(*aabb).contains(&id), "id {id} hits itself");
        }
    }

    #[test]
    fn default_options() {
        let tree: BvhTreeF64<u8> = BvhTree::default();
        assert_eq!(
            tree.options(),
            BvhOptions {
                tie_break: TieBreak::Right,
                prune_queries: true,
            }
        );
    }
}
