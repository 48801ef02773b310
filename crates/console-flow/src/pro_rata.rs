//! Amount received by a subscriber or pool member, from snapshot values.
//!
//! Two accounting styles exist on chain:
//!
//! - **Index (IDA)**: the index value is already "amount per unit", so the
//!   member's share of a delta is `delta * member_units`. No division at
//!   read time.
//! - **Pool (GDA)**: the pool tracks the total amount distributed, so the
//!   member's share of a delta is `delta * member_units / total_units`.
//!
//! `current` values are assumed never to decrease for a given pool or index.
//! Integer division truncates toward zero, the same as the contracts.

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use serde::Serialize;

use console_core::types::{IndexSubscriptionSnapshot, PoolMemberSnapshot, PoolSnapshot};

/// Index-style amount: `(current - snapshot) * member_units`.
pub fn index_amount_received(
    current_index_value: &BigInt,
    member_snapshot_value: &BigInt,
    member_units: &BigUint,
) -> BigInt {
    (current_index_value - member_snapshot_value) * BigInt::from(member_units.clone())
}

/// Total received by an index subscription once the index reached
/// `current_index_value`.
pub fn subscription_amount_received(sub: &IndexSubscriptionSnapshot, current_index_value: &BigInt) -> BigInt {
    &sub.total_amount_received_until_updated_at
        + index_amount_received(current_index_value, &sub.index_value_until_updated_at, &sub.units)
}

/// Pool-style amount:
/// `snapshot_amount_received + (pool_current - member_pool_snapshot) * member_units / total_units`.
///
/// With `total_units == 0` there is nothing to share and the snapshot
/// amount is returned unchanged.
pub fn pool_amount_received(
    snapshot_amount_received: &BigInt,
    pool_current_total_distributed: &BigInt,
    member_pool_snapshot: &BigInt,
    member_units: &BigUint,
    total_units: &BigUint,
) -> BigInt {
    if total_units.is_zero() {
        return snapshot_amount_received.clone();
    }
    let delta = pool_current_total_distributed - member_pool_snapshot;
    snapshot_amount_received + delta * BigInt::from(member_units.clone()) / BigInt::from(total_units.clone())
}

/// The pool's cumulative distributed amount at `at_secs`, extrapolating its
/// flow rate from the last update.
pub fn pool_total_distributed_at(pool: &PoolSnapshot, at_secs: u64) -> BigInt {
    let elapsed = i128::from(at_secs) - i128::from(pool.updated_at_timestamp);
    &pool.total_amount_distributed_until_updated_at + &pool.flow_rate * BigInt::from(elapsed)
}

/// The member's slice of the pool flow rate. Zero when either unit count is.
pub fn member_flow_rate(pool: &PoolSnapshot, member_units: &BigUint) -> BigInt {
    if pool.total_units.is_zero() || member_units.is_zero() {
        return BigInt::zero();
    }
    &pool.flow_rate * BigInt::from(member_units.clone()) / BigInt::from(pool.total_units.clone())
}

/// What a pool member has received by a given instant, and at what rate it
/// keeps receiving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberReceipt {
    #[serde(with = "console_core::types::decimal")]
    pub amount: BigInt,
    #[serde(with = "console_core::types::decimal")]
    pub flow_rate: BigInt,
    pub timestamp: u64,
}

/// Evaluate a pool member at `at_secs`.
///
/// A member without units keeps whatever the snapshot says it received and
/// has no flow rate.
pub fn member_received_at(member: &PoolMemberSnapshot, pool: &PoolSnapshot, at_secs: u64) -> MemberReceipt {
    if member.units.is_zero() {
        return MemberReceipt {
            amount: member.total_amount_received_until_updated_at.clone(),
            flow_rate: BigInt::zero(),
            timestamp: at_secs,
        };
    }

    let pool_current = pool_total_distributed_at(pool, at_secs);
    MemberReceipt {
        amount: pool_amount_received(
            &member.total_amount_received_until_updated_at,
            &pool_current,
            &member.pool_total_amount_distributed_until_updated_at,
            &member.units,
            &pool.total_units,
        ),
        flow_rate: member_flow_rate(pool, &member.units),
        timestamp: at_secs,
    }
}
