// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_bvh::{Aabb2D, BvhOptions, BvhTree, TieBreak};

fn gen_grid_rects(n: usize, cell: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Aabb2D::<f64>::from_xywh(x0, y0, cell, cell));
        }
    }
    out
}

fn gen_grid_rects_i64(n: usize, cell: i64) -> Vec<Aabb2D<i64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as i64 * cell;
            let y0 = y as i64 * cell;
            out.push(Aabb2D::<i64>::from_xywh(x0, y0, cell, cell));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_rects(
    count: usize,
    max_w: f64,
    max_h: f64,
    rect_w: f64,
    rect_h: f64,
) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let x0 = rng.next_f64() * (max_w - rect_w).max(1.0);
        let y0 = rng.next_f64() * (max_h - rect_h).max(1.0);
        out.push(Aabb2D::<f64>::from_xywh(x0, y0, rect_w, rect_h));
    }
    out
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * 2000.0, rng.next_f64() * 2000.0));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(Aabb2D::<f64>::from_xywh(cx + dx, cy + dy, 12.0, 12.0));
        }
    }
    out
}

fn build(rects: &[Aabb2D<f64>], options: BvhOptions) -> BvhTree<f64, u32> {
    let mut tree = BvhTree::with_options(options);
    for (i, r) in rects.iter().copied().enumerate() {
        tree.insert(r, i as u32);
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[32usize, 64, 128] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("f64_grid_n{}", n), |b| {
            b.iter_batched(
                BvhTree::<f64, u32>::new,
                |mut tree| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        tree.insert(r, i as u32);
                    }
                    black_box(tree.depth());
                },
                BatchSize::SmallInput,
            )
        });
    }
    for &n in &[32usize, 64] {
        let rects = gen_grid_rects_i64(n, 10);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("i64_grid_n{}", n), |b| {
            b.iter_batched(
                BvhTree::<i64, u32>::new,
                |mut tree| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        tree.insert(r, i as u32);
                    }
                    black_box(tree.depth());
                },
                BatchSize::SmallInput,
            )
        });
    }
    let rects = gen_clustered_rects(32, 128, 200.0);
    for (name, tie_break) in [
        ("clustered_tie_right", TieBreak::Right),
        ("clustered_tie_left", TieBreak::Left),
    ] {
        let options = BvhOptions {
            tie_break,
            ..Default::default()
        };
        group.bench_function(name, |b| {
            b.iter(|| black_box(build(&rects, options).depth()));
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");
    let rects = gen_random_rects(4096, 2000.0, 2000.0, 12.0, 12.0);
    let queries = gen_random_rects(256, 2000.0, 2000.0, 80.0, 80.0);
    for (name, prune_queries) in [("pruned", true), ("exhaustive", false)] {
        let tree = build(
            &rects,
            BvhOptions {
                prune_queries,
                ..Default::default()
            },
        );
        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_function(format!("overlaps_random_{}", name), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                for q in &queries {
                    tree.visit_overlaps(*q, |_| hits += 1);
                }
                black_box(hits)
            });
        });
    }
    let tree = build(&rects, BvhOptions::default());
    group.bench_function("point_random", |b| {
        b.iter(|| {
            let mut hits = 0_usize;
            for q in &queries {
                hits += tree.query_point(q.min_x, q.min_y).len();
            }
            black_box(hits)
        });
    });
    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    let rects = gen_random_rects(4096, 2000.0, 2000.0, 12.0, 12.0);
    group.throughput(Throughput::Elements(rects.len() as u64));

    // Sub-unit jitter: most moves stay inside the parent box.
    group.bench_function("jitter", |b| {
        b.iter_batched(
            || build(&rects, BvhOptions::default()),
            |mut tree| {
                for (i, r) in rects.iter().enumerate() {
                    let moved = Aabb2D::new(r.min_x + 0.25, r.min_y, r.max_x + 0.25, r.max_y);
                    let _ = tree.update(&(i as u32), moved);
                }
                black_box(tree.root_aabb());
            },
            BatchSize::LargeInput,
        )
    });

    // Long jumps: every move leaves its parent and is reinserted.
    let targets = gen_random_rects(4096, 2000.0, 2000.0, 12.0, 12.0)
        .into_iter()
        .map(|r| Aabb2D::new(r.min_x + 5000.0, r.min_y, r.max_x + 5000.0, r.max_y))
        .collect::<Vec<_>>();
    group.bench_function("teleport", |b| {
        b.iter_batched(
            || build(&rects, BvhOptions::default()),
            |mut tree| {
                for (i, r) in targets.iter().copied().enumerate() {
                    let _ = tree.update(&(i as u32), r);
                }
                black_box(tree.root_aabb());
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("remove_all", |b| {
        b.iter_batched(
            || build(&rects, BvhOptions::default()),
            |mut tree| {
                for i in 0..rects.len() as u32 {
                    let _ = tree.remove(&i);
                }
                black_box(tree.is_empty());
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_query, bench_update);
criterion_main!(benches);
