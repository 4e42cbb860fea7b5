// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Using the BVH with Kurbo geometry.
//!
//! Rows of a list are registered from `kurbo::Rect`s, then a scrolling viewport
//! selects the visible rows.
//!
//! Run:
//! - `cargo run -p understory_bvh_demos --example bvh_kurbo`

use kurbo::Rect;
use understory_bvh::BvhTreeF64;

const ROW_H: f64 = 20.0;
const WIDTH: f64 = 200.0;

fn main() {
    let mut tree: BvhTreeF64<usize> = BvhTreeF64::new();
    for i in 0..1000_usize {
        let y0 = i as f64 * ROW_H;
        tree.insert(Rect::new(0.0, y0, WIDTH, y0 + ROW_H).into(), i);
    }

    // Shrink the viewport by a hair so rows that only touch its edge are not reported.
    for scroll in [0.0, 30.0, 200.0, 600.0] {
        let viewport = Rect::new(0.0, scroll, WIDTH, scroll + 100.0).inset(-0.001);
        let mut visible = tree.query_overlaps(viewport.into());
        visible.sort_unstable();
        println!("scroll={scroll:.1} -> visible rows: {visible:?}");
    }

    if let Some(bounds) = tree.root_aabb() {
        println!("content bounds: {:?}", Rect::from(bounds));
    }
}
