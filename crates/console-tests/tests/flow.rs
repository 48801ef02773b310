//! Flowing balance and pool receipt scenarios.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use proptest::prelude::*;

use console_core::constants::StreamGranularity;
use console_core::types::{BalanceSnapshot, IndexSubscriptionSnapshot, RealtimeBalance, UnitShare};
use console_flow::{
    depletion_timestamp, extrapolate, format_ether, format_flow_rate, member_received_at, percentage,
    round_percentage, subscription_amount_received, unit_share_percentage, FlowingBalanceTicker,
};
use console_tests::helpers::{ether, member, pool};

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

// ---------------------------------------------------------------------------
// Flowing balance
// ---------------------------------------------------------------------------

#[test]
fn draining_stream_goes_negative_right_after_depletion() {
    // 10 ether draining at roughly 1 ether per hour
    let per_second = ether(1) / BigInt::from(3_600);
    let snapshot = BalanceSnapshot::new(ether(10), 1_700_000_000, -per_second);
    let at = depletion_timestamp(&snapshot).unwrap() as i64;

    assert_eq!(at, 1_700_000_000 + 36_000);
    assert!(extrapolate(&snapshot, at * 1_000) >= BigInt::from(0));
    assert!(extrapolate(&snapshot, (at + 1) * 1_000) < BigInt::from(0));
}

#[test]
fn realtime_balance_feeds_extrapolation() {
    let rt = RealtimeBalance {
        balance: ether(1),
        balance_timestamp: 1_000,
        flow_rate: BigInt::from(1_000),
    };
    let snapshot = BalanceSnapshot::from(rt);
    assert_eq!(extrapolate(&snapshot, 1_002_500), ether(1) + BigInt::from(2_500));
}

#[test]
fn ticker_emits_formatted_frames() {
    let snapshot = BalanceSnapshot::new(ether(1), 0, ether(1));
    let mut ticker = FlowingBalanceTicker::new(snapshot);

    let first = ticker.tick(0, 1_500).unwrap();
    assert_eq!(format_ether(&first, 4), "2.5");
    assert!(ticker.tick(40, 1_540).is_none());
    assert!(ticker.tick(120, 1_620).is_some());
}

// ---------------------------------------------------------------------------
// Pool and index receipts
// ---------------------------------------------------------------------------

#[test]
fn pool_member_accrues_share_of_stream() {
    // pool streams 400 wei/s to 100 units; member holds 25
    let p = pool(400, BigInt::from(10_000), 100, 1_000);
    let m = member(25, BigInt::from(500), BigInt::from(8_000));

    let at_update = member_received_at(&m, &p, 1_000);
    assert_eq!(at_update.amount, BigInt::from(500 + 2_000 * 25 / 100));
    assert_eq!(at_update.flow_rate, BigInt::from(100));

    let later = member_received_at(&m, &p, 1_010);
    assert_eq!(later.amount - at_update.amount, BigInt::from(1_000));
    assert_eq!(format_flow_rate(&later.flow_rate, StreamGranularity::Minute, 2), "~0/minute");
}

#[test]
fn departed_member_keeps_snapshot_amount() {
    let p = pool(400, BigInt::from(10_000), 100, 1_000);
    let m = member(0, BigInt::from(777), BigInt::from(0));
    let r = member_received_at(&m, &p, 5_000);
    assert_eq!(r.amount, BigInt::from(777));
    assert_eq!(r.flow_rate, BigInt::from(0));
}

#[test]
fn index_subscription_multiplies_by_units() {
    let sub = IndexSubscriptionSnapshot {
        units: 3u32.into(),
        index_value_until_updated_at: BigInt::from(100),
        total_amount_received_until_updated_at: BigInt::from(50),
    };
    assert_eq!(subscription_amount_received(&sub, &BigInt::from(110)), BigInt::from(80));
}

// ---------------------------------------------------------------------------
// Percentages
// ---------------------------------------------------------------------------

#[test]
fn member_percentage_of_pool() {
    let share = UnitShare {
        total_units: 300u32.into(),
        member_units: 100u32.into(),
    };
    assert_eq!(round_percentage(&unit_share_percentage(&share), 2), dec("33.33"));
    assert_eq!(percentage(&dec("0"), &dec("5")), dec("0"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Shares of a partition of the pool sum to 100% within rounding.
    #[test]
    fn partition_shares_sum_to_hundred(a in 1u64..1_000_000, b in 1u64..1_000_000) {
        let total = BigDecimal::from(a + b);
        let sum = percentage(&total, &BigDecimal::from(a)) + percentage(&total, &BigDecimal::from(b));
        prop_assert!((sum - BigDecimal::from(100)).abs() < dec("0.000001"));
    }

    /// A member with units always has a receipt no smaller than its snapshot
    /// while the pool only grows.
    #[test]
    fn receipts_never_shrink(
        flow in 0i64..1_000_000,
        total in 1u64..10_000,
        held in 1u64..10_000,
        dt in 0u64..1_000_000,
    ) {
        let held = held.min(total);
        let p = pool(flow, BigInt::from(0), total, 0);
        let m = member(held, BigInt::from(0), BigInt::from(0));
        let early = member_received_at(&m, &p, 0);
        let late = member_received_at(&m, &p, dt);
        prop_assert!(late.amount >= early.amount);
    }
}
