//! Reconcile and apply throughput over generated product tables.

mod common;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reconcile_engine::{apply, MemoryStorage, Reconciler, Schema, SqliteStorage, StoragePort};

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("Reconcile");
    let reconciler = Reconciler::new(Schema::inventory());

    for rows in [100, 1_000, 10_000] {
        let snapshot = common::create_snapshot(rows);
        let edited = common::create_edits(&snapshot, 0.1, 7);
        group.bench_with_input(BenchmarkId::new("rows", rows), &rows, |b, _| {
            b.iter(|| black_box(reconciler.reconcile(&snapshot, &edited).unwrap()))
        });
    }
    group.finish();
}

fn bench_noop(c: &mut Criterion) {
    let reconciler = Reconciler::new(Schema::inventory());
    let snapshot = common::create_snapshot(10_000);
    let edited = common::create_edits(&snapshot, 0.0, 7);
    c.bench_function("Reconcile/unchanged_10000", |b| {
        b.iter(|| black_box(reconciler.reconcile(&snapshot, &edited).unwrap()))
    });
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("Apply");
    group.sample_size(20);
    let reconciler = Reconciler::new(Schema::inventory());
    let snapshot = common::create_snapshot(1_000);
    let edited = common::create_edits(&snapshot, 0.2, 11);
    let changes = reconciler.reconcile(&snapshot, &edited).unwrap().changes;

    group.bench_function("memory", |b| {
        b.iter_batched(
            || (MemoryStorage::with_records(snapshot.clone()).unwrap(), changes.clone()),
            |(mut storage, changes)| black_box(apply(changes, &mut storage)),
            criterion::BatchSize::SmallInput,
        )
    });

    group.bench_function("sqlite", |b| {
        b.iter_batched(
            || {
                let mut storage = SqliteStorage::open_in_memory().unwrap();
                for record in &snapshot {
                    storage.create(&record.fields).unwrap();
                }
                (storage, changes.clone())
            },
            |(mut storage, changes)| black_box(apply(changes, &mut storage)),
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_reconcile, bench_noop, bench_apply);
criterion_main!(benches);
