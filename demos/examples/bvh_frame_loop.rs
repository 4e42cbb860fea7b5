// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Broad phase in a simulation loop.
//!
//! A few hundred bodies drift every frame. Each frame moves every body in the
//! tree, then collects candidate pairs with overlap queries. Most moves are
//! small and are applied in place; the counts are printed per frame.
//!
//! Run:
//! - `cargo run -p understory_bvh_demos --example bvh_frame_loop`

use understory_bvh::{Aabb2D, BvhTreeF32, MoveOutcome};

const BODIES: u32 = 300;
const FRAMES: u32 = 10;
const SIZE: f32 = 4.0;

struct Body {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
}

impl Body {
    fn aabb(&self) -> Aabb2D<f32> {
        Aabb2D::<f32>::from_xywh(self.x, self.y, SIZE, SIZE)
    }
}

fn main() {
    env_logger::init();

    // Deterministic spread without pulling in an RNG.
    let mut bodies: Vec<Body> = (0..BODIES)
        .map(|i| {
            let f = i as f32;
            Body {
                x: (f * 37.0) % 400.0,
                y: (f * 91.0) % 400.0,
                vx: ((i % 7) as f32 - 3.0) * 0.1,
                vy: ((i % 5) as f32 - 2.0) * 0.1,
            }
        })
        .collect();

    let mut tree: BvhTreeF32<u32> = bodies
        .iter()
        .zip(0..)
        .map(|(b, id)| (b.aabb(), id))
        .collect();

    for frame in 0..FRAMES {
        let (mut in_place, mut reinserted) = (0, 0);
        for (id, body) in (0_u32..).zip(bodies.iter_mut()) {
            body.x += body.vx;
            body.y += body.vy;
            match tree.update(&id, body.aabb()) {
                Ok(MoveOutcome::InPlace) => in_place += 1,
                Ok(MoveOutcome::Reinserted) => reinserted += 1,
                Err(e) => log::error!("body {id}: {e}"),
            }
        }

        let mut pairs = 0;
        for (id, body) in (0_u32..).zip(bodies.iter()) {
            tree.visit_overlaps(body.aabb(), |other| {
                if *other > id {
                    pairs += 1;
                }
            });
        }
        let depth = tree.depth();
        println!(
            "frame {frame}: {in_place} in place, {reinserted} reinserted, \
             {pairs} candidate pairs, depth {depth}"
        );
    }
}
