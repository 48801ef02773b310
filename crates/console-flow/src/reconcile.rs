//! Matching distributions to the period a membership actually held units.
//!
//! A member should only be credited with distributions that happened while
//! it was in the pool. Units history arrives newest first from the indexer;
//! the window is read off its head.
//!
//! Events are ordered by [`EventPosition`], i.e. `(timestamp, log_index)`.
//! A units update and a distribution can land in the same transaction and
//! share a timestamp; the log index then says which one took effect first.

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use serde::Serialize;

use console_core::types::{DistributionAmount, DistributionEvent, EventPosition, UnitsUpdatedEvent};

/// The span during which a membership held non-zero units.
///
/// `start` is the units update that (re)activated the membership, `end`
/// the one that set units back to zero. Both bounds are events, so a
/// distribution sharing their timestamp is placed by log index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ActiveWindow {
    pub start: Option<EventPosition>,
    pub end: Option<EventPosition>,
}

impl ActiveWindow {
    /// No units history at all: nothing to filter on.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether an event at `position` happened while the membership was active.
    ///
    /// An unbounded window admits everything. A window with an end but no
    /// start describes a membership that never held units and admits nothing.
    pub fn contains(&self, position: &EventPosition) -> bool {
        match (self.start, self.end) {
            (None, None) => true,
            (None, Some(_)) => false,
            (Some(start), end) => *position > start && end.is_none_or(|end| *position < end),
        }
    }
}

/// Sort units history newest first, the order [`active_window`] expects.
pub fn sort_newest_first(events: &mut [UnitsUpdatedEvent]) {
    events.sort_by(|a, b| b.position().cmp(&a.position()));
}

/// Active window of the latest membership period.
///
/// `units_events` must be newest first. `end` is the newest event when it is
/// a termination (zero units) and absent while the membership is active.
/// `start` is the oldest event of the unbroken run of non-zero updates just
/// before `end` (or just before now, if still active).
pub fn active_window(units_events: &[UnitsUpdatedEvent]) -> ActiveWindow {
    let end = units_events
        .first()
        .filter(|e| e.is_termination())
        .map(UnitsUpdatedEvent::position);

    let start = units_events
        .iter()
        .skip_while(|e| e.is_termination())
        .take_while(|e| !e.is_termination())
        .last()
        .map(UnitsUpdatedEvent::position);

    ActiveWindow { start, end }
}

/// Distributions inside `window`, in their original order.
pub fn matching_distributions<'a>(
    distributions: &'a [DistributionEvent],
    window: &ActiveWindow,
) -> Vec<&'a DistributionEvent> {
    distributions
        .iter()
        .filter(|d| window.contains(&d.position()))
        .collect()
}

/// The units update in force at `position`: the newest one strictly before it.
///
/// `units_events` must be newest first.
pub fn units_at<'a>(units_events: &'a [UnitsUpdatedEvent], position: &EventPosition) -> Option<&'a UnitsUpdatedEvent> {
    units_events.iter().find(|e| e.position() < *position)
}

/// A member's cut of one distribution given the units it held.
pub fn member_distribution_amount(distribution: &DistributionEvent, member_units: &BigUint) -> BigInt {
    let units = BigInt::from(member_units.clone());
    match &distribution.amount {
        DistributionAmount::IndexDelta { delta } => delta * units,
        DistributionAmount::PoolTotal { amount, total_units } => {
            if total_units.is_zero() {
                BigInt::zero()
            } else {
                amount * units / BigInt::from(total_units.clone())
            }
        }
    }
}

/// One distribution together with what the member got out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributedDistribution<'a> {
    pub event: &'a DistributionEvent,
    #[serde(with = "console_core::types::decimal")]
    pub member_units: BigUint,
    #[serde(with = "console_core::types::decimal")]
    pub amount: BigInt,
}

/// Credit each distribution in the member's active window with the units
/// in force at the time. `units_events` must be newest first.
pub fn attribute_distributions<'a>(
    units_events: &[UnitsUpdatedEvent],
    distributions: &'a [DistributionEvent],
) -> Vec<AttributedDistribution<'a>> {
    let window = active_window(units_events);
    matching_distributions(distributions, &window)
        .into_iter()
        .map(|event| {
            let member_units = units_at(units_events, &event.position())
                .map(|u| u.units.clone())
                .unwrap_or_default();
            let amount = member_distribution_amount(event, &member_units);
            AttributedDistribution {
                event,
                member_units,
                amount,
            }
        })
        .collect()
}
