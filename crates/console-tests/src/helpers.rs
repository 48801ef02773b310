//! Shared builders for scenario tests.

use std::collections::HashMap;
use std::sync::Mutex;

use num_bigint::{BigInt, BigUint};

use console_core::error::BalanceError;
use console_core::traits::BalanceSource;
use console_core::types::{
    BalanceQuery, DistributionEvent, PoolMemberSnapshot, PoolSnapshot, RealtimeBalance, UnitsUpdatedEvent,
};

/// `n` ether in wei.
pub fn ether(n: i64) -> BigInt {
    BigInt::from(n) * BigInt::from(10u64).pow(18)
}

/// Units update at `(timestamp, log_index)`.
pub fn units(n: u64, timestamp: u64, log_index: u64) -> UnitsUpdatedEvent {
    UnitsUpdatedEvent::new(n, timestamp, log_index)
}

/// Units history from `(units, timestamp, log_index)` triples, returned
/// newest first regardless of input order.
pub fn history(events: &[(u64, u64, u64)]) -> Vec<UnitsUpdatedEvent> {
    let mut out: Vec<_> = events.iter().map(|&(n, t, li)| units(n, t, li)).collect();
    console_flow::reconcile::sort_newest_first(&mut out);
    out
}

/// Index distribution of `delta` per unit.
pub fn index_dist(delta: i64, timestamp: u64, log_index: u64) -> DistributionEvent {
    DistributionEvent::index(delta, timestamp, log_index)
}

pub fn pool(flow_rate: i64, distributed: BigInt, total_units: u64, updated_at: u64) -> PoolSnapshot {
    PoolSnapshot {
        flow_rate: BigInt::from(flow_rate),
        total_amount_distributed_until_updated_at: distributed,
        total_units: BigUint::from(total_units),
        updated_at_timestamp: updated_at,
    }
}

pub fn member(units: u64, received: BigInt, pool_distributed: BigInt) -> PoolMemberSnapshot {
    PoolMemberSnapshot {
        units: BigUint::from(units),
        total_amount_received_until_updated_at: received,
        pool_total_amount_distributed_until_updated_at: pool_distributed,
    }
}

/// In-memory [`BalanceSource`] that records every batch it is asked for.
#[derive(Default)]
pub struct MockBalanceSource {
    balances: HashMap<String, RealtimeBalance>,
    failing_chains: Vec<u64>,
    calls: Mutex<Vec<(u64, usize)>>,
}

impl MockBalanceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(mut self, query: &BalanceQuery, balance: RealtimeBalance) -> Self {
        self.balances.insert(query.key(), balance);
        self
    }

    pub fn failing_on(mut self, chain_id: u64) -> Self {
        self.failing_chains.push(chain_id);
        self
    }

    /// `(chain_id, batch_size)` per call to `realtime_balances`.
    pub fn calls(&self) -> Vec<(u64, usize)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl BalanceSource for MockBalanceSource {
    fn realtime_balance(&self, query: &BalanceQuery) -> Result<RealtimeBalance, BalanceError> {
        if self.failing_chains.contains(&query.chain_id) {
            return Err(BalanceError::Source {
                key: query.key(),
                reason: "rpc unavailable".into(),
            });
        }
        self.balances
            .get(&query.key())
            .cloned()
            .ok_or_else(|| BalanceError::Missing(query.key()))
    }

    fn realtime_balances(&self, queries: &[BalanceQuery]) -> Result<Vec<RealtimeBalance>, BalanceError> {
        if let (Some(first), Ok(mut calls)) = (queries.first(), self.calls.lock()) {
            calls.push((first.chain_id, queries.len()));
        }
        queries.iter().map(|q| self.realtime_balance(q)).collect()
    }
}
