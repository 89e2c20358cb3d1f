//! Criterion benchmarks for drip-ledger hot paths.
//!
//! Covers: settlement preview, productivity changes, and take/mint against
//! a ledger with many participants (per-call cost must stay flat).

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use drip_core::constants::COIN;
use drip_core::fixed::mul_div_floor;
use drip_core::types::{Address, CallContext};
use drip_ledger::{preview_settlement, Ledger};

const DEPLOYER: Address = Address([0xD0; 20]);

fn participant(i: u32) -> Address {
    let mut bytes = [0u8; 20];
    bytes[..4].copy_from_slice(&i.to_le_bytes());
    Address(bytes)
}

/// Ledger with `n` participants of weight 1..=n, all joined at block 0.
fn populated(n: u32) -> Ledger {
    let mut ledger = Ledger::new(DEPLOYER, COIN, 0);
    let ctx = CallContext::new(DEPLOYER, 0);
    for i in 1..=n {
        ledger
            .increase_productivity(&ctx, &participant(i), i as u128 * COIN)
            .unwrap();
    }
    ledger.drain_events();
    ledger
}

fn bench_mul_div(c: &mut Criterion) {
    // Product needs the 256-bit path.
    let a = u128::MAX / 3;
    let b = 1_000_000_000_000u128;
    let d = 7 * COIN;

    c.bench_function("mul_div_floor_wide", |bch| {
        bch.iter(|| mul_div_floor(black_box(a), black_box(b), black_box(d)))
    });
}

fn bench_preview_settlement(c: &mut Criterion) {
    let ledger = populated(100);

    c.bench_function("preview_settlement", |b| {
        b.iter(|| preview_settlement(black_box(ledger.global()), black_box(1_000)))
    });
}

fn bench_increase_productivity(c: &mut Criterion) {
    let ledger = populated(10_000);
    let user = participant(5_000);

    c.bench_function("increase_productivity_10k_holders", |b| {
        b.iter_batched(
            || ledger.clone(),
            |mut l| {
                l.increase_productivity(&CallContext::new(DEPLOYER, 50), black_box(&user), COIN)
                    .unwrap();
                l
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

fn bench_take(c: &mut Criterion) {
    let ledger = populated(10_000);
    let ctx = CallContext::new(participant(7_777), 1_000);

    c.bench_function("take_10k_holders", |b| {
        b.iter(|| ledger.take(black_box(&ctx)))
    });
}

criterion_group!(
    benches,
    bench_mul_div,
    bench_preview_settlement,
    bench_increase_productivity,
    bench_take
);
criterion_main!(benches);
