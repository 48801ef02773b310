//! Per-request batching of realtime balance lookups.
//!
//! A [`BalanceBatch`] collects queries grouped by chain and resolves them
//! against a [`BalanceSource`] in one pass per chain. It is an ordinary
//! value owned by whoever builds the request, so two requests never share
//! a queue.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::error::{BalanceError, ConsoleError};
use crate::traits::BalanceSource;
use crate::types::{BalanceQuery, RealtimeBalance};

/// Queued balance queries, keyed by chain id.
#[derive(Debug, Default, Clone)]
pub struct BalanceBatch {
    chains: BTreeMap<u64, Vec<BalanceQuery>>,
}

impl BalanceBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a query. Returns `false` if an equal query (by
    /// [`BalanceQuery::key`]) is already waiting.
    pub fn enqueue(&mut self, query: BalanceQuery) -> bool {
        let key = query.key();
        let queue = self.chains.entry(query.chain_id).or_default();
        if queue.iter().any(|q| q.key() == key) {
            debug!(%key, "balance query already queued");
            return false;
        }
        queue.push(query);
        true
    }

    /// Total queued queries across all chains.
    pub fn len(&self) -> usize {
        self.chains.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.values().all(Vec::is_empty)
    }

    /// Chains with at least one queued query, ascending.
    pub fn chain_ids(&self) -> Vec<u64> {
        self.chains
            .iter()
            .filter(|(_, q)| !q.is_empty())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Remove and return everything queued for one chain.
    pub fn drain_chain(&mut self, chain_id: u64) -> Vec<BalanceQuery> {
        self.chains.remove(&chain_id).unwrap_or_default()
    }

    /// Resolve every queued query through `source`, one call per chain.
    ///
    /// Chains are independent: a chain whose source call fails is reported
    /// in [`BatchResolution::failures`] and the other chains still resolve.
    /// The batch is empty afterwards.
    pub fn resolve<S: BalanceSource + ?Sized>(&mut self, source: &S) -> BatchResolution {
        let mut out = BatchResolution::default();
        for (chain_id, queries) in std::mem::take(&mut self.chains) {
            if queries.is_empty() {
                continue;
            }
            debug!(chain_id, count = queries.len(), "resolving balance batch");

            match resolve_chain(source, chain_id, &queries) {
                Ok(balances) => out.balances.extend(balances),
                Err(e) => {
                    warn!(chain_id, error = %e, "balance batch failed");
                    out.failures.insert(chain_id, e);
                }
            }
        }
        out
    }
}

fn resolve_chain<S: BalanceSource + ?Sized>(
    source: &S,
    chain_id: u64,
    queries: &[BalanceQuery],
) -> Result<Vec<(String, RealtimeBalance)>, BalanceError> {
    let balances = source.realtime_balances(queries)?;
    if balances.len() != queries.len() {
        let missing = queries
            .get(balances.len())
            .map(BalanceQuery::key)
            .unwrap_or_else(|| format!("chain {chain_id}"));
        return Err(BalanceError::Missing(missing));
    }
    Ok(queries.iter().map(BalanceQuery::key).zip(balances).collect())
}

/// Outcome of [`BalanceBatch::resolve`]: balances from every chain that
/// answered, and the error for every chain that did not.
#[derive(Debug, Default, Clone)]
pub struct BatchResolution {
    /// Keyed by [`BalanceQuery::key`].
    pub balances: HashMap<String, RealtimeBalance>,
    pub failures: BTreeMap<u64, BalanceError>,
}

impl BatchResolution {
    pub fn get(&self, query: &BalanceQuery) -> Option<&RealtimeBalance> {
        self.balances.get(&query.key())
    }

    /// True when no chain failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// All balances, or the first failure by chain id.
    pub fn into_result(self) -> Result<HashMap<String, RealtimeBalance>, ConsoleError> {
        match self.failures.into_values().next() {
            Some(e) => Err(e.into()),
            None => Ok(self.balances),
        }
    }
}
