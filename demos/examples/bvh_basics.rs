// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! BVH basics.
//!
//! Register a few objects, query, move one in place and one far away, remove,
//! and print the hierarchy after each step.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_bvh_demos --example bvh_basics`

use understory_bvh::{Aabb2D, BvhError, BvhTree};

fn main() {
    env_logger::init();

    let mut tree: BvhTree<f64, String> = BvhTree::new();
    tree.insert(Aabb2D::new(0.0, 0.0, 1.0, 1.0), "A".to_string());
    tree.insert(Aabb2D::new(5.0, 5.0, 6.0, 6.0), "B".to_string());
    tree.insert(Aabb2D::new(0.5, 0.5, 1.5, 1.5), "C".to_string());
    println!("after inserts:\n{}", tree.dump());

    let mut hits = tree.query_overlaps(Aabb2D::new(0.0, 0.0, 2.0, 2.0));
    hits.sort();
    println!("overlapping [0, 0] - [2, 2]: {hits:?}");
    assert_eq!(hits, ["A", "C"], "B is far away");

    // Small move: stays inside its parent box.
    let outcome = tree.update("C", Aabb2D::new(0.25, 0.25, 1.25, 1.25));
    println!("move C nearby: {outcome:?}");

    // Large move: escapes its parent box and is reinserted.
    let outcome = tree.update("A", Aabb2D::new(5.5, 5.5, 6.5, 6.5));
    println!("move A next to B: {outcome:?}\n{}", tree.dump());

    match tree.remove("nobody") {
        Err(e @ BvhError::NotFound) => println!("removing an unknown id reports: {e}"),
        other => unreachable!("unexpected result {other:?}"),
    }

    tree.remove("B").expect("B is registered");
    println!("after removing B:\n{}", tree.dump());
    println!("{tree:?}");
}
