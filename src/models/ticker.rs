//! Ticker models.
//!
//! The venue has no dedicated ticker feed worth normalizing directly, so
//! two shapes are exposed: the raw per-execution quote fact and the
//! caller-facing [`Ticker`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::Side;
use super::product::Product;

/// Quote and trade facts captured at execution time, before normalization.
///
/// Carries fields the normalized [`Ticker`] omits (sequence, taker side).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawTicker {
    pub trade_id: Option<u64>,
    pub price: Decimal,
    pub size: Option<Decimal>,
    pub bid: Option<Decimal>,
    pub ask: Option<Decimal>,
    /// Rolling 24h volume.
    pub volume: Option<Decimal>,
    pub time: Option<DateTime<Utc>>,
    pub side: Option<Side>,
    pub sequence: u64,
}

/// Rolling 24h (and 30d volume) statistics attached to a tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickerStats {
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub volume_30d: Option<Decimal>,
}

/// Normalized ticker for a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticker {
    pub instrument: Product,
    pub last: Decimal,
    pub bid: Option<Decimal>,
    pub ask: Option<Decimal>,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub timestamp: Option<DateTime<Utc>>,
}
