//! Benchmark for the delta application hot path

use common::{DeltaRecord, OrderId, Px, Qty};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lob::OrderBook;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn synth_deltas(count: u64) -> Vec<DeltaRecord> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..count)
        .map(|i| {
            let order_id = OrderId::new(i % 512);
            if i % 17 == 0 {
                // Cancel; sometimes for an id that never rested.
                return DeltaRecord::new('B', Px::ZERO, Qty::ZERO, order_id);
            }
            let side = if rng.gen_bool(0.5) { 'B' } else { 'S' };
            let price = Px::new(100.0 + rng.gen_range(-5.0..5.0));
            let size = Qty::new(rng.gen_range(1.0..500.0));
            DeltaRecord::new(side, price, size, order_id)
        })
        .collect()
}

fn bench_apply_delta(c: &mut Criterion) {
    let deltas = synth_deltas(10_000);

    c.bench_function("apply_delta_10k", |b| {
        b.iter(|| {
            let mut book = OrderBook::new();
            for delta in &deltas {
                let _ = book.apply_delta(black_box(delta));
            }
            black_box(book.best_bid())
        });
    });
}

criterion_group!(benches, bench_apply_delta);
criterion_main!(benches);
