//! Console constants. All token amounts are in wei (1 token = 10^18 wei).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of decimals of every super token amount.
pub const ETHER_DECIMALS: u32 = 18;

/// Milliseconds per second, used when extrapolating at millisecond resolution.
pub const MS_PER_SECOND: i64 = 1_000;

/// Minimum wall-clock time between two recomputations of a flowing balance.
///
/// Anything faster is not visible on screen.
pub const ANIMATION_MINIMUM_STEP_MS: u64 = 80;

/// Latest representable depletion instant: 9999-12-31T23:59:59Z.
pub const MAX_TIMESTAMP_SECS: u64 = 253_402_300_799;

/// Percentages are expressed out of this value.
pub const PERCENT: u32 = 100;

/// Decimal places used when a pool percentage is rendered.
pub const DEFAULT_PERCENTAGE_DECIMAL_PLACES: i64 = 2;

/// Decimal places used when an ether amount is rendered.
pub const DEFAULT_ETHER_DECIMAL_PLACES: u32 = 8;

/// Time unit a flow rate is displayed in.
///
/// # Examples
///
/// ```
/// use console_core::constants::StreamGranularity;
/// assert_eq!(StreamGranularity::default(), StreamGranularity::Day);
/// assert_eq!(StreamGranularity::Hour.seconds(), 3_600);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamGranularity {
    Second,
    Minute,
    Hour,
    #[default]
    Day,
    Week,
    /// Thirty days.
    Month,
}

impl StreamGranularity {
    /// All granularities, shortest first.
    pub const ALL: [StreamGranularity; 6] = [
        Self::Second,
        Self::Minute,
        Self::Hour,
        Self::Day,
        Self::Week,
        Self::Month,
    ];

    /// Length of the unit in seconds.
    pub fn seconds(&self) -> u64 {
        match self {
            Self::Second => 1,
            Self::Minute => 60,
            Self::Hour => 3_600,
            Self::Day => 86_400,
            Self::Week => 86_400 * 7,
            Self::Month => 86_400 * 30,
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for StreamGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamGranularity {
    type Err = crate::error::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == lower)
            .ok_or(crate::error::ParseError::UnknownGranularity(s.to_string()))
    }
}
