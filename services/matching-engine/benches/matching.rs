//! Order book benchmarks.
//!
//! Run with: cargo bench -p matching-engine

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use matching_engine::{Orderbook, OrderbookConfig};
use types::clock::StepClock;
use types::ids::UserId;
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

fn create_book() -> Orderbook {
    Orderbook::with_config(OrderbookConfig::default(), Arc::new(StepClock::new(0, 1)))
}

fn order(side: Side, size: u64) -> Order {
    Order::new(UserId::new("bench"), side, Quantity::from_u64(size), 0)
}

/// Book with `depth` asks spread over 100 price levels
fn seeded_book(depth: u64, size: u64) -> Orderbook {
    let mut book = create_book();
    for i in 0..depth {
        book.place_limit_order(Price::from_u64(10_000 + i % 100), order(Side::Ask, size))
            .unwrap();
    }
    book
}

fn bench_insert_empty(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_empty");
    group.throughput(Throughput::Elements(1));

    group.bench_function("limit_order", |b| {
        let mut book = create_book();
        b.iter(|| black_box(book.place_limit_order(Price::from_u64(10_000), order(Side::Bid, 100))))
    });

    group.finish();
}

fn bench_insert_deep_book(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_deep_book");
    group.throughput(Throughput::Elements(1));

    for depth in [100u64, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            let mut book = seeded_book(depth, 100);
            b.iter(|| black_box(book.place_limit_order(Price::from_u64(9_990), order(Side::Bid, 100))))
        });
    }

    group.finish();
}

fn bench_market_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("market_sweep");

    for count in [1u64, 10, 100] {
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || seeded_book(1_000, 10),
                |mut book| {
                    let mut taker = order(Side::Bid, 10 * count);
                    black_box(book.place_market_order(&mut taker))
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_cancel(c: &mut Criterion) {
    let mut group = c.benchmark_group("cancel");
    group.throughput(Throughput::Elements(1));

    group.bench_function("middle_of_level", |b| {
        b.iter_batched(
            || {
                let mut book = create_book();
                let mut ids = Vec::new();
                for _ in 0..100 {
                    let o = order(Side::Ask, 10);
                    ids.push(o.order_id);
                    book.place_limit_order(Price::from_u64(10_000), o).unwrap();
                }
                (book, ids[50])
            },
            |(mut book, id)| black_box(book.cancel_order(id)),
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_empty,
    bench_insert_deep_book,
    bench_market_sweep,
    bench_cancel,
);

criterion_main!(benches);
