//! # console-flow
//! Flowing balance and distribution arithmetic.
//!
//! All on-chain quantities are arbitrary-precision integers; nothing is
//! converted to floating point before display.
//!
//! - **Percentage**: a member's share of pool or index units.
//! - **Pro-rata**: amount received by an index subscriber or pool member
//!   from snapshot values.
//! - **Flowing balance**: linear extrapolation of a streamed balance, the
//!   animation cadence around it, and the depletion instant.
//! - **Reconciliation**: the window during which a membership held units,
//!   and which distributions fall inside it.
//! - **Formatting**: wei to ether strings and flow rates per time unit.

pub mod flowing;
pub mod format;
pub mod percentage;
pub mod pro_rata;
pub mod reconcile;

pub use flowing::{depletion_date, depletion_timestamp, extrapolate, FlowingBalanceTicker};
pub use format::{flow_rate_per, format_ether, format_flow_rate};
pub use percentage::{percentage, round_percentage, unit_share_percentage};
pub use pro_rata::{
    index_amount_received, member_flow_rate, member_received_at, pool_amount_received,
    pool_total_distributed_at, subscription_amount_received, MemberReceipt,
};
pub use reconcile::{active_window, attribute_distributions, matching_distributions, ActiveWindow};
