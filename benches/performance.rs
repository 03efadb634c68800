//! Performance benchmarks for the ordered collection algorithms.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use feeds_state::{ActivityData, OrderedCollectionExt, Timestamp};
use std::cmp::Ordering;

fn newest_first(a: &ActivityData, b: &ActivityData) -> Ordering {
    b.created_at.cmp(&a.created_at)
}

/// A feed page sorted newest first.
fn feed(size: usize) -> Vec<ActivityData> {
    let mut items: Vec<ActivityData> = (0..size)
        .map(|i| ActivityData::new(format!("a{i}"), "alice", Timestamp(i as i64 * 10)))
        .collect();
    items.sort_by(newest_first);
    items
}

/// Benchmark inserting a fresh activity at the head of feeds of varying size
fn bench_sorted_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorted_insert");

    for size in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("new_record", size), &size, |b, &size| {
            let base = feed(size);
            b.iter(|| {
                let mut items = base.clone();
                let record = ActivityData::new("fresh", "bob", Timestamp(size as i64 * 10 + 5));
                items.sorted_insert(black_box(record), newest_first);
                items
            });
        });

        // Re-inserting an existing record whose key moved to the other end
        // exercises the duplicate scan over the whole neighbourhood.
        group.bench_with_input(BenchmarkId::new("moved_record", size), &size, |b, &size| {
            let base = feed(size);
            b.iter(|| {
                let mut items = base.clone();
                let record = ActivityData::new("a0", "alice", Timestamp(size as i64 * 10 + 5));
                items.sorted_insert(black_box(record), newest_first);
                items
            });
        });
    }

    group.finish();
}

/// Benchmark merging a page of updates into an existing feed
fn bench_sorted_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorted_merge");

    for size in [100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("page_of_25", size), &size, |b, &size| {
            let base = feed(size);
            // Half of the page replaces stored records, half is new.
            let page: Vec<ActivityData> = (0..25)
                .map(|i| {
                    let id = if i % 2 == 0 { format!("a{i}") } else { format!("new{i}") };
                    ActivityData::new(id, "bob", Timestamp((size as i64 + i) * 10))
                })
                .collect();

            b.iter(|| base.sorted_merge(black_box(page.clone()), newest_first));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sorted_insert, bench_sorted_merge);
criterion_main!(benches);
