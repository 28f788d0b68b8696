// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for flow layout passes over synthetic widget trees.
//!
//! Trees alternate rows and columns by depth, with a mix of fixed-size nodes
//! and expanding/filling ones, roughly like a tool window: toolbars, splits,
//! and long lists of rows.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use understory_flow::{FlowLayout, Invalidation, NodeId, NodeKind, Rect, Size, SizePolicy, Tree};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn below(&mut self, upper_exclusive: u32) -> u32 {
        if upper_exclusive == 0 {
            return 0;
        }
        self.next_u32() % upper_exclusive
    }
}

const POLICIES: [SizePolicy; 5] = [
    SizePolicy::empty(),
    SizePolicy::EXPAND_X,
    SizePolicy::FILL_Y,
    SizePolicy::EXPAND_X.union(SizePolicy::FILL_X),
    SizePolicy::all(),
];

/// Builds a tree of `depth` container levels with `fanout` children each.
/// Returns the root and the leaves.
fn build_tree(depth: u32, fanout: u32, seed: u64) -> (Tree, NodeId, Vec<NodeId>) {
    let mut tree = Tree::new();
    let mut rng = Lcg::new(seed);
    let root = tree
        .insert(None, NodeKind::Flow(FlowLayout::vertical()))
        .unwrap();
    let mut frontier = vec![root];
    let mut leaves = Vec::new();
    for level in 1..=depth {
        let mut next = Vec::new();
        for &parent in &frontier {
            for _ in 0..fanout {
                let kind = if level == depth {
                    let w = 8 + rng.below(120) as i32;
                    let h = 8 + rng.below(40) as i32;
                    NodeKind::Fixed(Size::new(w, h))
                } else {
                    NodeKind::Flow(FlowLayout {
                        vertical: level % 2 == 0,
                    })
                };
                let id = tree.insert(Some(parent), kind).unwrap();
                let policy = POLICIES[rng.below(POLICIES.len() as u32) as usize];
                tree.set_policy(id, policy).unwrap();
                if level == depth {
                    leaves.push(id);
                } else {
                    next.push(id);
                }
            }
        }
        frontier = next;
    }
    (tree, root, leaves)
}

fn bench_flow_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_flow");
    group.sample_size(50);
    let bounds = Rect::new(0, 0, 1920, 1080);

    for &(depth, fanout) in &[(3_u32, 4_u32), (4, 6), (6, 4)] {
        let label = format!("d={depth},f={fanout}");

        group.bench_function(BenchmarkId::new("full_layout", &label), |b| {
            b.iter_batched(
                || build_tree(depth, fanout, 0xF10A_0000_0000_0001),
                |(mut tree, root, _)| {
                    tree.layout(root, bounds);
                    black_box(tree);
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(BenchmarkId::new("measure_root", &label), |b| {
            let (mut tree, root, _) = build_tree(depth, fanout, 0xF10A_0000_0000_0002);
            b.iter(|| black_box(tree.measure(root, bounds.size())));
        });

        group.bench_function(BenchmarkId::new("relayout_after_leaf_mark", &label), |b| {
            b.iter_batched(
                || {
                    let (mut tree, root, leaves) =
                        build_tree(depth, fanout, 0xF10A_0000_0000_0003);
                    tree.layout(root, bounds);
                    let _ = tree.drain_paint(root, |_, _, _| {});
                    tree.mark(leaves[leaves.len() / 2], Invalidation::NEEDS_LAYOUT);
                    (tree, root)
                },
                |(mut tree, root)| {
                    let ran = tree.layout_if_needed(root, bounds);
                    let painted = tree.drain_paint(root, |_, r, _| {
                        black_box(r);
                    });
                    black_box((ran, painted));
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(BenchmarkId::new("layout_if_needed_clean", &label), |b| {
            let (mut tree, root, _) = build_tree(depth, fanout, 0xF10A_0000_0000_0004);
            tree.layout(root, bounds);
            b.iter(|| black_box(tree.layout_if_needed(root, bounds)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_flow_layout);
criterion_main!(benches);
