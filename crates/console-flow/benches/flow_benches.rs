//! Criterion benchmarks for console-flow hot paths.
//!
//! Covers: flowing balance extrapolation (run every animation frame),
//! pool member evaluation, and distribution attribution over a long history.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_bigint::{BigInt, BigUint};

use console_core::types::{
    parse_int, BalanceSnapshot, DistributionEvent, PoolMemberSnapshot, PoolSnapshot, UnitsUpdatedEvent,
};
use console_flow::flowing::extrapolate;
use console_flow::format::format_ether;
use console_flow::pro_rata::member_received_at;
use console_flow::reconcile::attribute_distributions;

fn bench_extrapolate(c: &mut Criterion) {
    let snapshot = BalanceSnapshot::new(
        parse_int("123456789012345678901234567890").unwrap(),
        1_700_000_000,
        -385_802_469_135_802i64,
    );

    c.bench_function("extrapolate", |b| {
        b.iter(|| extrapolate(black_box(&snapshot), black_box(1_700_000_123_456)))
    });
}

fn bench_format_ether(c: &mut Criterion) {
    let wei = parse_int("123456789012345678901234567890").unwrap();

    c.bench_function("format_ether", |b| b.iter(|| format_ether(black_box(&wei), black_box(8))));
}

fn bench_member_received(c: &mut Criterion) {
    let pool = PoolSnapshot {
        flow_rate: BigInt::from(1_000_000_000_000i64),
        total_amount_distributed_until_updated_at: parse_int("5000000000000000000000").unwrap(),
        total_units: BigUint::from(1_000_000u32),
        updated_at_timestamp: 1_700_000_000,
    };
    let member = PoolMemberSnapshot {
        units: BigUint::from(2_500u32),
        total_amount_received_until_updated_at: parse_int("1000000000000000000").unwrap(),
        pool_total_amount_distributed_until_updated_at: parse_int("4000000000000000000000").unwrap(),
    };

    c.bench_function("member_received_at", |b| {
        b.iter(|| member_received_at(black_box(&member), black_box(&pool), black_box(1_700_086_400)))
    });
}

fn bench_attribution(c: &mut Criterion) {
    // 1000 alternating join/leave updates, newest first, and 1000 distributions.
    let history: Vec<UnitsUpdatedEvent> = (0..1_000u64)
        .rev()
        .map(|i| UnitsUpdatedEvent::new(if i % 2 == 0 { 0u32 } else { 10u32 }, i * 10, 0))
        .collect();
    let distributions: Vec<DistributionEvent> =
        (0..1_000u64).map(|i| DistributionEvent::index(1_000, i * 10 + 5, 1)).collect();

    c.bench_function("attribute_distributions", |b| {
        b.iter(|| attribute_distributions(black_box(&history), black_box(&distributions)))
    });
}

criterion_group!(
    benches,
    bench_extrapolate,
    bench_format_ether,
    bench_member_received,
    bench_attribution,
);
criterion_main!(benches);
