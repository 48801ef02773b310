//! Rendering wei amounts and flow rates.

use num_bigint::{BigInt, BigUint};
use num_traits::{Signed, Zero};

use console_core::constants::{ETHER_DECIMALS, StreamGranularity};

/// Render `wei` as ether with at most `decimal_places` fractional digits.
///
/// Rounds half away from zero, trims trailing zeros and separates
/// thousands with commas. A leading `~` marks a value that lost digits.
///
/// ```
/// use num_bigint::BigInt;
/// use console_flow::format::format_ether;
/// let wei: BigInt = "1234567891234567891234".parse().unwrap();
/// assert_eq!(format_ether(&wei, 4), "~1,234.5679");
/// assert_eq!(format_ether(&BigInt::from(10).pow(18), 4), "1");
/// ```
pub fn format_ether(wei: &BigInt, decimal_places: u32) -> String {
    let places = decimal_places.min(ETHER_DECIMALS);
    let dropped = BigUint::from(10u32).pow(ETHER_DECIMALS - places);
    let magnitude = wei.magnitude();

    let mut scaled = magnitude / &dropped;
    let remainder = magnitude % &dropped;
    let rounded = !remainder.is_zero();
    if remainder * 2u32 >= dropped && rounded {
        scaled += 1u32;
    }

    let unit = BigUint::from(10u32).pow(places);
    let whole = (&scaled / &unit).to_string();
    let fraction = format!("{:0>width$}", (&scaled % &unit).to_string(), width = places as usize);
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::new();
    if rounded {
        out.push('~');
    }
    if wei.is_negative() && !scaled.is_zero() {
        out.push('-');
    }
    out.push_str(&group_thousands(&whole));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Flow rate (wei per second) scaled to one `granularity` unit.
pub fn flow_rate_per(flow_rate: &BigInt, granularity: StreamGranularity) -> BigInt {
    flow_rate * BigInt::from(granularity.seconds())
}

/// `"{ether}/{granularity}"`, e.g. `"~0.0333/day"`.
pub fn format_flow_rate(flow_rate: &BigInt, granularity: StreamGranularity, decimal_places: u32) -> String {
    format!(
        "{}/{}",
        format_ether(&flow_rate_per(flow_rate, granularity), decimal_places),
        granularity
    )
}
