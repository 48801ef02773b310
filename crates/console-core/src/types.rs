//! Subgraph and contract projections consumed by the calculators.
//!
//! None of these are owned here: they are read-only views of what the
//! indexer returned. Big integers travel as decimal strings on the wire
//! (see [`decimal`]) and field names follow the subgraph's camelCase.

use std::fmt;

use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Parse a signed decimal integer as emitted by the subgraph.
pub fn parse_int(s: &str) -> Result<BigInt, ParseError> {
    s.trim()
        .parse::<BigInt>()
        .map_err(|_| ParseError::InvalidInteger(s.to_string()))
}

/// Parse an unsigned unit count.
pub fn parse_units(s: &str) -> Result<BigUint, ParseError> {
    let trimmed = s.trim();
    if trimmed.starts_with('-') {
        return Err(ParseError::NegativeUnits(s.to_string()));
    }
    trimmed
        .parse::<BigUint>()
        .map_err(|_| ParseError::InvalidInteger(s.to_string()))
}

/// Extract the log index from a subgraph event id.
///
/// Event ids look like `"IndexUpdated-0xabc…-42"`; the log index is the
/// last dash-separated segment.
pub fn log_index_from_event_id(id: &str) -> Result<u64, ParseError> {
    id.rsplit('-')
        .next()
        .and_then(|tail| tail.parse::<u64>().ok())
        .ok_or_else(|| ParseError::MissingLogIndex(id.to_string()))
}

/// Serde adapter for big integers encoded as decimal strings.
///
/// Plain JSON numbers are accepted on input as well, since some endpoints
/// return small values unquoted.
pub mod decimal {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Str(String),
        Signed(i64),
        Unsigned(u64),
    }

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let text = match Repr::deserialize(deserializer)? {
            Repr::Str(s) => s,
            Repr::Signed(n) => n.to_string(),
            Repr::Unsigned(n) => n.to_string(),
        };
        text.trim().parse::<T>().map_err(D::Error::custom)
    }
}

/// Where an event sits in chain order.
///
/// Ordering is lexicographic on `(timestamp, log_index)`: within one block
/// (equal timestamps) a higher log index happened later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPosition {
    pub timestamp: u64,
    pub log_index: u64,
}

impl EventPosition {
    pub fn new(timestamp: u64, log_index: u64) -> Self {
        Self { timestamp, log_index }
    }
}

impl fmt::Display for EventPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.timestamp, self.log_index)
    }
}

/// A member's units against the pool or index total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitShare {
    #[serde(with = "decimal")]
    pub total_units: BigUint,
    #[serde(with = "decimal")]
    pub member_units: BigUint,
}

/// A streaming balance as last observed by the indexer.
///
/// The true balance at `t` seconds is `balance + flow_rate * (t - timestamp)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshot {
    #[serde(with = "decimal")]
    pub balance: BigInt,
    /// Unix seconds.
    pub timestamp: u64,
    /// Wei per second; negative for a net outflow.
    #[serde(with = "decimal")]
    pub flow_rate: BigInt,
}

impl BalanceSnapshot {
    pub fn new(balance: impl Into<BigInt>, timestamp: u64, flow_rate: impl Into<BigInt>) -> Self {
        Self {
            balance: balance.into(),
            timestamp,
            flow_rate: flow_rate.into(),
        }
    }
}

/// A membership's unit count changing. Zero units ends the membership.
///
/// Deserializes from subgraph events as well: a missing `logIndex` is read
/// off the event `id`, and the timestamp may be a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawUnitsUpdatedEvent")]
pub struct UnitsUpdatedEvent {
    #[serde(serialize_with = "decimal::serialize")]
    pub units: BigUint,
    pub timestamp: u64,
    pub log_index: u64,
}

impl UnitsUpdatedEvent {
    pub fn new(units: impl Into<BigUint>, timestamp: u64, log_index: u64) -> Self {
        Self {
            units: units.into(),
            timestamp,
            log_index,
        }
    }

    pub fn position(&self) -> EventPosition {
        EventPosition::new(self.timestamp, self.log_index)
    }

    /// True if this update removed the member (units set to zero).
    pub fn is_termination(&self) -> bool {
        self.units.is_zero()
    }
}

/// How much a distribution moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DistributionAmount {
    /// Per-unit index value delta (`newIndexValue - oldIndexValue`).
    /// The indexer already divided by total units.
    #[serde(rename_all = "camelCase")]
    IndexDelta {
        #[serde(with = "decimal")]
        delta: BigInt,
    },
    /// Total amount sent to a pool, to be shared across `total_units`.
    #[serde(rename_all = "camelCase")]
    PoolTotal {
        #[serde(with = "decimal")]
        amount: BigInt,
        #[serde(with = "decimal")]
        total_units: BigUint,
    },
}

/// Funds distributed to a pool or index.
///
/// Accepts the same subgraph shape as [`UnitsUpdatedEvent`] on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawDistributionEvent")]
pub struct DistributionEvent {
    pub amount: DistributionAmount,
    pub timestamp: u64,
    pub log_index: u64,
}

impl DistributionEvent {
    pub fn index(delta: impl Into<BigInt>, timestamp: u64, log_index: u64) -> Self {
        Self {
            amount: DistributionAmount::IndexDelta { delta: delta.into() },
            timestamp,
            log_index,
        }
    }

    /// Build from an `IndexUpdated` event's old and new index values.
    pub fn from_index_update(old_index_value: &BigInt, new_index_value: &BigInt, timestamp: u64, log_index: u64) -> Self {
        Self::index(new_index_value - old_index_value, timestamp, log_index)
    }

    pub fn pool(amount: impl Into<BigInt>, total_units: impl Into<BigUint>, timestamp: u64, log_index: u64) -> Self {
        Self {
            amount: DistributionAmount::PoolTotal {
                amount: amount.into(),
                total_units: total_units.into(),
            },
            timestamp,
            log_index,
        }
    }

    pub fn position(&self) -> EventPosition {
        EventPosition::new(self.timestamp, self.log_index)
    }
}

/// Explicit `logIndex` if present, else the suffix of the subgraph `id`.
fn resolve_log_index(log_index: Option<u64>, id: Option<&str>) -> Result<u64, ParseError> {
    match (log_index, id) {
        (Some(li), _) => Ok(li),
        (None, Some(id)) => log_index_from_event_id(id),
        (None, None) => Err(ParseError::MissingLogIndex(String::new())),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUnitsUpdatedEvent {
    #[serde(with = "decimal")]
    units: String,
    #[serde(with = "decimal")]
    timestamp: u64,
    #[serde(default)]
    log_index: Option<u64>,
    #[serde(default)]
    id: Option<String>,
}

impl TryFrom<RawUnitsUpdatedEvent> for UnitsUpdatedEvent {
    type Error = ParseError;

    fn try_from(raw: RawUnitsUpdatedEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            units: parse_units(&raw.units)?,
            timestamp: raw.timestamp,
            log_index: resolve_log_index(raw.log_index, raw.id.as_deref())?,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDistributionEvent {
    amount: DistributionAmount,
    #[serde(with = "decimal")]
    timestamp: u64,
    #[serde(default)]
    log_index: Option<u64>,
    #[serde(default)]
    id: Option<String>,
}

impl TryFrom<RawDistributionEvent> for DistributionEvent {
    type Error = ParseError;

    fn try_from(raw: RawDistributionEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: raw.amount,
            timestamp: raw.timestamp,
            log_index: resolve_log_index(raw.log_index, raw.id.as_deref())?,
        })
    }
}

/// GDA pool state as of its last update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot {
    #[serde(with = "decimal")]
    pub flow_rate: BigInt,
    #[serde(with = "decimal")]
    pub total_amount_distributed_until_updated_at: BigInt,
    #[serde(with = "decimal")]
    pub total_units: BigUint,
    pub updated_at_timestamp: u64,
}

/// GDA pool member state as of its last update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolMemberSnapshot {
    #[serde(with = "decimal")]
    pub units: BigUint,
    #[serde(with = "decimal")]
    pub total_amount_received_until_updated_at: BigInt,
    /// Pool's cumulative distribution when this member was last updated.
    #[serde(with = "decimal")]
    pub pool_total_amount_distributed_until_updated_at: BigInt,
}

/// IDA index subscription as of its last update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSubscriptionSnapshot {
    #[serde(with = "decimal")]
    pub units: BigUint,
    #[serde(with = "decimal")]
    pub index_value_until_updated_at: BigInt,
    #[serde(with = "decimal")]
    pub total_amount_received_until_updated_at: BigInt,
}

/// A super token balance lookup for one account on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceQuery {
    pub chain_id: u64,
    pub token_address: String,
    pub account_address: String,
}

impl BalanceQuery {
    pub fn new(chain_id: u64, token_address: impl Into<String>, account_address: impl Into<String>) -> Self {
        Self {
            chain_id,
            token_address: token_address.into(),
            account_address: account_address.into(),
        }
    }

    /// Case-insensitive cache key: `"{chain}-{token}-{account}"`.
    pub fn key(&self) -> String {
        format!("{}-{}-{}", self.chain_id, self.token_address, self.account_address).to_lowercase()
    }
}

/// Balance and net flow read directly from the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeBalance {
    #[serde(with = "decimal")]
    pub balance: BigInt,
    pub balance_timestamp: u64,
    #[serde(with = "decimal")]
    pub flow_rate: BigInt,
}

impl From<RealtimeBalance> for BalanceSnapshot {
    fn from(rt: RealtimeBalance) -> Self {
        Self {
            balance: rt.balance,
            timestamp: rt.balance_timestamp,
            flow_rate: rt.flow_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_int_handles_256_bit_values() {
        let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(parse_int(max).unwrap().to_string(), max);
    }

    #[test]
    fn parse_int_negative() {
        assert_eq!(parse_int("-42").unwrap(), BigInt::from(-42));
    }

    #[test]
    fn parse_int_rejects_garbage() {
        assert_eq!(parse_int("1e18"), Err(ParseError::InvalidInteger("1e18".into())));
    }

    #[test]
    fn parse_units_rejects_negative() {
        assert!(matches!(parse_units("-1"), Err(ParseError::NegativeUnits(_))));
    }

    #[test]
    fn log_index_from_subgraph_id() {
        assert_eq!(log_index_from_event_id("IndexUpdated-0xdeadbeef-17").unwrap(), 17);
    }

    #[test]
    fn log_index_missing() {
        assert!(log_index_from_event_id("IndexUpdated-0xdeadbeef-").is_err());
        assert!(log_index_from_event_id("no-number-here").is_err());
    }

    #[test]
    fn event_position_orders_by_timestamp_then_log_index() {
        assert!(EventPosition::new(100, 9) < EventPosition::new(101, 0));
        assert!(EventPosition::new(100, 1) < EventPosition::new(100, 2));
        assert_eq!(EventPosition::new(5, 5), EventPosition::new(5, 5));
    }

    #[test]
    fn termination_is_zero_units() {
        assert!(UnitsUpdatedEvent::new(0u32, 1, 0).is_termination());
        assert!(!UnitsUpdatedEvent::new(1u32, 1, 0).is_termination());
    }

    #[test]
    fn index_update_delta() {
        let e = DistributionEvent::from_index_update(&BigInt::from(100), &BigInt::from(175), 10, 3);
        assert_eq!(e.amount, DistributionAmount::IndexDelta { delta: BigInt::from(75) });
        assert_eq!(e.position(), EventPosition::new(10, 3));
    }

    #[test]
    fn balance_query_key_is_lowercase() {
        let q = BalanceQuery::new(137, "0xABC", "0xDeF");
        assert_eq!(q.key(), "137-0xabc-0xdef");
    }

    #[test]
    fn snapshot_deserializes_from_subgraph_json() {
        let json = r#"{"balance":"1000000000000000000000","timestamp":1700000000,"flowRate":"-385802469135802"}"#;
        let snap: BalanceSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.balance, parse_int("1000000000000000000000").unwrap());
        assert_eq!(snap.timestamp, 1_700_000_000);
        assert_eq!(snap.flow_rate, BigInt::from(-385_802_469_135_802i64));
    }

    #[test]
    fn decimal_accepts_plain_numbers() {
        let json = r#"{"units":5,"timestamp":200,"logIndex":1}"#;
        let e: UnitsUpdatedEvent = serde_json::from_str(json).unwrap();
        assert_eq!(e.units, BigUint::from(5u32));
    }

    #[test]
    fn snapshot_serializes_big_integers_as_strings() {
        let snap = BalanceSnapshot::new(-7, 1, 3);
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["balance"], "-7");
        assert_eq!(json["flowRate"], "3");
    }

    #[test]
    fn distribution_amount_tagged_json() {
        let json = r#"{"amount":{"kind":"poolTotal","amount":"400","totalUnits":"100"},"timestamp":250,"logIndex":4}"#;
        let e: DistributionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(e, DistributionEvent::pool(400, 100u32, 250, 4));
    }

    #[test]
    fn realtime_balance_into_snapshot() {
        let rt = RealtimeBalance {
            balance: BigInt::from(9),
            balance_timestamp: 77,
            flow_rate: BigInt::from(-1),
        };
        assert_eq!(BalanceSnapshot::from(rt), BalanceSnapshot::new(9, 77, -1));
    }

    #[test]
    fn units_event_from_raw_subgraph_entity() {
        let json = r#"{"id":"PoolMemberUnitsUpdatedEvent-0xabc-12","units":"250","timestamp":"1700000000"}"#;
        let e: UnitsUpdatedEvent = serde_json::from_str(json).unwrap();
        assert_eq!(e, UnitsUpdatedEvent::new(250u32, 1_700_000_000, 12));
    }

    #[test]
    fn explicit_log_index_wins_over_id() {
        let json = r#"{"id":"X-0xabc-12","units":"1","timestamp":5,"logIndex":3}"#;
        let e: UnitsUpdatedEvent = serde_json::from_str(json).unwrap();
        assert_eq!(e.log_index, 3);
    }

    #[test]
    fn units_event_without_position_rejected() {
        assert!(serde_json::from_str::<UnitsUpdatedEvent>(r#"{"units":"1","timestamp":5}"#).is_err());
        assert!(serde_json::from_str::<UnitsUpdatedEvent>(r#"{"units":"1","timestamp":5,"id":"X-0xabc-"}"#).is_err());
    }

    #[test]
    fn negative_units_rejected_on_input() {
        let json = r#"{"units":"-4","timestamp":5,"logIndex":0}"#;
        let err = serde_json::from_str::<UnitsUpdatedEvent>(json).unwrap_err();
        assert!(err.to_string().contains("negative units"));
    }

    #[test]
    fn distribution_event_log_index_from_id() {
        let json = r#"{"id":"InstantDistributionUpdatedEvent-0xdef-7","amount":{"kind":"indexDelta","delta":"30"},"timestamp":"250"}"#;
        let e: DistributionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(e, DistributionEvent::index(30, 250, 7));
    }

    #[test]
    fn units_event_serializes_back_to_canonical_form() {
        let e = UnitsUpdatedEvent::new(5u32, 200, 1);
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["units"], "5");
        assert_eq!(json["timestamp"], 200);
        assert_eq!(json["logIndex"], 1);
        let back: UnitsUpdatedEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, e);
    }

    proptest! {
        #[test]
        fn parse_int_accepts_any_i128(n in any::<i128>()) {
            prop_assert_eq!(parse_int(&n.to_string()).unwrap(), BigInt::from(n));
        }

        #[test]
        fn event_position_matches_tuple_order(a in any::<(u64, u64)>(), b in any::<(u64, u64)>()) {
            let pa = EventPosition::new(a.0, a.1);
            let pb = EventPosition::new(b.0, b.1);
            prop_assert_eq!(pa.cmp(&pb), a.cmp(&b));
        }

        #[test]
        fn log_index_is_last_segment(name in "[A-Za-z]{1,12}", li in any::<u64>()) {
            let id = format!("{name}-0xabc-{li}");
            prop_assert_eq!(log_index_from_event_id(&id).unwrap(), li);
        }
    }
}
