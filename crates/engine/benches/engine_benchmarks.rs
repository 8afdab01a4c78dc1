use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pirs_core::{EngineConfig, Sku};
use pirs_engine::InventoryEngine;
use pirs_inventory::{NewProduct, ProductStore};

fn new_product(i: usize) -> NewProduct {
    NewProduct {
        sku: Sku::parse(format!("SKU{i:06}")).unwrap(),
        name: format!("Bench item {i}"),
        unit_price: 1_000,
        stock: 500,
        lead_time_days: 7,
        daily_consumption: (i % 50 + 1) as f64,
    }
}

fn seeded_store(n: usize) -> ProductStore {
    let mut store = ProductStore::new(&EngineConfig::default());
    for i in 0..n {
        store.add(new_product(i)).unwrap();
    }
    store
}

/// Stock updates re-key the stability index and the heap on every call.
fn bench_update_stock(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_stock");
    for &size in &[100usize, 1_000, 10_000] {
        let mut store = seeded_store(size);
        let skus: Vec<Sku> = (0..size).map(|i| new_product(i).sku).collect();
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            let mut i = 0usize;
            b.iter(|| {
                let sku = &skus[i % size];
                let qty = ((i * 7919) % 1_000) as i64;
                black_box(store.update_stock(sku, qty).unwrap());
                i += 1;
            })
        });
    }
    group.finish();
}

fn bench_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("reads");
    let store = seeded_store(10_000);
    group.bench_function("peek_min", |b| b.iter(|| black_box(store.peek_min().unwrap())));
    group.bench_function("range_below_7d", |b| {
        b.iter(|| black_box(store.range_below(7.0).count()))
    });
    group.bench_function("audit_window_5", |b| b.iter(|| black_box(store.audit_window(5))));
    group.finish();
}

/// Full engine path: lock, mutate, consistency-free release build.
fn bench_engine_round_trip(c: &mut Criterion) {
    let engine = InventoryEngine::default();
    engine.load_catalog((0..1_000).map(new_product)).unwrap();
    let target = new_product(42).sku;

    c.bench_function("engine_update_then_summary", |b| {
        let mut qty = 0i64;
        b.iter(|| {
            qty = (qty + 13) % 900;
            engine.update_stock(&target, qty).unwrap();
            black_box(engine.summary().unwrap())
        })
    });
}

criterion_group!(benches, bench_update_stock, bench_reads, bench_engine_round_trip);
criterion_main!(benches);
