// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for the text viewport: rewrapping after edits and keeping a
//! moving index in view.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use understory_flow::Rect;
use understory_text_view::{MonoDrawer, MonoFace, Text};

fn document(lines: usize) -> String {
    let mut s = String::new();
    for i in 0..lines {
        // Mixed line lengths so that some lines soft-wrap.
        let words = 3 + (i * 7) % 23;
        for w in 0..words {
            s.push_str(if w % 5 == 0 { "wrapping " } else { "text " });
        }
        s.push('\n');
    }
    s
}

fn text_with(doc: &str) -> Text<MonoDrawer> {
    let mut text = Text::new(MonoDrawer::new(MonoFace::new(8, 16)));
    text.set_scrollable(false, true);
    text.set_str(doc).unwrap();
    text.layout(Rect::new(0, 0, 640, 480));
    text
}

fn bench_text_viewport(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_text_view");
    group.sample_size(50);

    for &lines in &[1_000_usize, 20_000] {
        let doc = document(lines);

        group.bench_function(BenchmarkId::new("set_str_and_measure", lines), |b| {
            b.iter_batched(
                || text_with(""),
                |mut text| {
                    text.set_str(&doc).unwrap();
                    black_box(text.measure(text.bounds().size()));
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(BenchmarkId::new("scroll_sweep", lines), |b| {
            let mut text = text_with(&doc);
            let len = text.len();
            let step = (len / 64).max(1);
            b.iter(|| {
                let mut i = 0;
                while i < len {
                    text.make_index_visible(i);
                    i += step;
                }
                text.set_rune_offset(0);
                black_box(text.rune_offset());
            });
        });

        group.bench_function(BenchmarkId::new("insert_then_reveal", lines), |b| {
            b.iter_batched(
                || text_with(&doc),
                |mut text| {
                    let at = text.len() / 2;
                    text.insert(at, b"inserted\n").unwrap();
                    text.make_index_visible(at);
                    black_box(text.take_invalidation());
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_text_viewport);
criterion_main!(benches);
