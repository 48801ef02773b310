//! Trait interfaces at the edge of the console.
//!
//! - [`BalanceSource`]: realtime super token balances (an RPC client or a
//!   test double implements it)

use crate::error::BalanceError;
use crate::types::{BalanceQuery, RealtimeBalance};

/// Reads realtime balances straight from the chain.
///
/// Implementations do their own transport; [`crate::batch::BalanceBatch`]
/// only decides which queries go out together.
pub trait BalanceSource: Send + Sync {
    /// Balance and net flow rate for one account and token.
    fn realtime_balance(&self, query: &BalanceQuery) -> Result<RealtimeBalance, BalanceError>;

    /// Fetch several balances at once.
    ///
    /// Default implementation calls [`realtime_balance`](Self::realtime_balance)
    /// for each query in order and stops at the first failure.
    fn realtime_balances(&self, queries: &[BalanceQuery]) -> Result<Vec<RealtimeBalance>, BalanceError> {
        queries.iter().map(|q| self.realtime_balance(q)).collect()
    }
}
