//! Flowing balance extrapolation.
//!
//! A streamed balance is only ever observed at discrete snapshots; between
//! them it moves linearly at `flow_rate` wei per second. [`extrapolate`]
//! evaluates that line at millisecond resolution using integer arithmetic,
//! [`FlowingBalanceTicker`] paces re-evaluation for live display, and
//! [`depletion_timestamp`] solves for the instant a draining balance hits 0.

use chrono::{DateTime, Duration, Utc};
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use tracing::debug;

use console_core::constants::{ANIMATION_MINIMUM_STEP_MS, MAX_TIMESTAMP_SECS, MS_PER_SECOND};
use console_core::types::BalanceSnapshot;

/// Balance at `at_ms` (unix milliseconds):
/// `balance + flow_rate * (at_ms - timestamp * 1000) / 1000`.
///
/// The division truncates toward zero. At `at_ms == timestamp * 1000`
/// this is exactly `balance`; with a zero flow rate it is `balance` for
/// every `at_ms`.
pub fn extrapolate(snapshot: &BalanceSnapshot, at_ms: i64) -> BigInt {
    if snapshot.flow_rate.is_zero() {
        return snapshot.balance.clone();
    }
    let snapshot_ms = i128::from(snapshot.timestamp) * i128::from(MS_PER_SECOND);
    let elapsed_ms = BigInt::from(i128::from(at_ms) - snapshot_ms);
    &snapshot.balance + &snapshot.flow_rate * elapsed_ms / MS_PER_SECOND
}

/// Balance at whole second `at_secs`.
pub fn extrapolate_at_secs(snapshot: &BalanceSnapshot, at_secs: u64) -> BigInt {
    let elapsed = i128::from(at_secs) - i128::from(snapshot.timestamp);
    &snapshot.balance + &snapshot.flow_rate * BigInt::from(elapsed)
}

/// Unix second at which a draining balance reaches zero.
///
/// `None` unless the flow rate is negative. Computed as
/// `timestamp + balance / |flow_rate|` (truncating) and clamped to
/// [`MAX_TIMESTAMP_SECS`]. A balance that is already non-positive depletes
/// at the snapshot itself.
pub fn depletion_timestamp(snapshot: &BalanceSnapshot) -> Option<u64> {
    if !snapshot.flow_rate.is_negative() {
        return None;
    }
    if !snapshot.balance.is_positive() {
        return Some(snapshot.timestamp.min(MAX_TIMESTAMP_SECS));
    }

    let seconds_left = &snapshot.balance / -&snapshot.flow_rate;
    let depleted_at = BigInt::from(snapshot.timestamp) + seconds_left;
    match depleted_at.to_u64() {
        Some(t) if t <= MAX_TIMESTAMP_SECS => Some(t),
        _ => {
            debug!(%depleted_at, "depletion beyond representable range, clamping");
            Some(MAX_TIMESTAMP_SECS)
        }
    }
}

/// [`depletion_timestamp`] as a calendar instant.
pub fn depletion_date(snapshot: &BalanceSnapshot) -> Option<DateTime<Utc>> {
    depletion_timestamp(snapshot).and_then(|t| DateTime::from_timestamp(t as i64, 0))
}

/// Time left until depletion as seen at `now_secs`; zero once depleted.
pub fn time_until_depletion(snapshot: &BalanceSnapshot, now_secs: u64) -> Option<Duration> {
    depletion_timestamp(snapshot).map(|t| Duration::seconds(t.saturating_sub(now_secs) as i64))
}

/// Paces recomputation of a flowing balance for live display.
///
/// Feed it every animation frame; it only produces a value when more than
/// [`ANIMATION_MINIMUM_STEP_MS`] passed since the last one it produced. A
/// snapshot with zero flow rate yields its balance once and then nothing.
#[derive(Debug, Clone)]
pub struct FlowingBalanceTicker {
    snapshot: BalanceSnapshot,
    last_frame_ms: Option<u64>,
    min_step_ms: u64,
}

impl FlowingBalanceTicker {
    pub fn new(snapshot: BalanceSnapshot) -> Self {
        Self::with_min_step(snapshot, ANIMATION_MINIMUM_STEP_MS)
    }

    pub fn with_min_step(snapshot: BalanceSnapshot, min_step_ms: u64) -> Self {
        Self {
            snapshot,
            last_frame_ms: None,
            min_step_ms,
        }
    }

    /// True when the balance never changes, so no frame loop is needed.
    pub fn is_static(&self) -> bool {
        self.snapshot.flow_rate.is_zero()
    }

    pub fn snapshot(&self) -> &BalanceSnapshot {
        &self.snapshot
    }

    /// Offer a frame. `frame_ms` is the monotonic frame clock, `wall_ms` the
    /// unix time used for extrapolation.
    pub fn tick(&mut self, frame_ms: u64, wall_ms: i64) -> Option<BigInt> {
        let due = match self.last_frame_ms {
            None => true,
            Some(_) if self.is_static() => false,
            Some(last) => frame_ms.saturating_sub(last) > self.min_step_ms,
        };
        if !due {
            return None;
        }
        self.last_frame_ms = Some(frame_ms);
        Some(extrapolate(&self.snapshot, wall_ms))
    }

    /// Swap in a fresh snapshot; the next frame recomputes immediately.
    pub fn reset(&mut self, snapshot: BalanceSnapshot) {
        self.snapshot = snapshot;
        self.last_frame_ms = None;
    }
}
