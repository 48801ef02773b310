//! A member's percentage of pool or index units.
//!
//! Kept at full decimal precision; only [`round_percentage`] loses digits,
//! and only callers rendering the value should use it.

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::BigInt;
use num_traits::Zero;

use console_core::constants::PERCENT;
use console_core::types::UnitShare;

/// `individual_units / total_units * 100`, or 0 if either side is zero.
pub fn percentage(total_units: &BigDecimal, individual_units: &BigDecimal) -> BigDecimal {
    if total_units.is_zero() || individual_units.is_zero() {
        return BigDecimal::zero();
    }
    individual_units / total_units * BigDecimal::from(PERCENT)
}

/// [`percentage`] over a [`UnitShare`].
pub fn unit_share_percentage(share: &UnitShare) -> BigDecimal {
    let total = BigDecimal::new(BigInt::from(share.total_units.clone()), 0);
    let member = BigDecimal::new(BigInt::from(share.member_units.clone()), 0);
    percentage(&total, &member)
}

/// Round half-up to `decimal_places` for display.
pub fn round_percentage(value: &BigDecimal, decimal_places: i64) -> BigDecimal {
    value.with_scale_round(decimal_places, RoundingMode::HalfUp)
}
