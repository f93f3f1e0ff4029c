//! Decoded feed messages.
//!
//! Every frame on a product channel is tagged by its `type` field. The four
//! tags the pipeline consumes are modeled as a closed sum type; everything
//! else the venue sends (subscription acks, heartbeats, order lifecycle
//! events) decodes to [`StreamMessage::Unknown`] and is dropped by routing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::Side;
use super::book::{LevelChange, PriceLevel};
use crate::Result;
use crate::error::CambistError;

/// A raw text frame as delivered by the channel subscriber.
pub type RawFrame = String;

/// A decoded message from a product channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    /// Full level-2 book, replacing any maintained state.
    Snapshot(BookSnapshot),
    /// Incremental level-2 changes.
    #[serde(rename = "l2update")]
    Delta(BookDelta),
    /// Quote tick emitted alongside each execution.
    Ticker(TickerTick),
    /// A trade execution (wire name: `"match"`).
    Match(Execution),
    #[serde(other)]
    Unknown,
}

/// Discriminant of a [`StreamMessage`], used for category routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Snapshot,
    Delta,
    TickerTick,
    Execution,
}

impl StreamMessage {
    /// Returns the routing kind, or `None` for unrecognized tags.
    pub fn kind(&self) -> Option<MessageKind> {
        match self {
            StreamMessage::Snapshot(_) => Some(MessageKind::Snapshot),
            StreamMessage::Delta(_) => Some(MessageKind::Delta),
            StreamMessage::Ticker(_) => Some(MessageKind::TickerTick),
            StreamMessage::Match(_) => Some(MessageKind::Execution),
            StreamMessage::Unknown => None,
        }
    }

    /// Returns the venue product id (`"BTC-USD"`) the message belongs to.
    pub fn product_id(&self) -> Option<&str> {
        match self {
            StreamMessage::Snapshot(m) => Some(&m.product_id),
            StreamMessage::Delta(m) => Some(&m.product_id),
            StreamMessage::Ticker(m) => Some(&m.product_id),
            StreamMessage::Match(m) => Some(&m.product_id),
            StreamMessage::Unknown => None,
        }
    }

    /// Returns the message time, if the venue supplied one.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        match self {
            StreamMessage::Snapshot(m) => m.time,
            StreamMessage::Delta(m) => m.time,
            StreamMessage::Ticker(m) => m.time,
            StreamMessage::Match(m) => Some(m.time),
            StreamMessage::Unknown => None,
        }
    }
}

/// Decodes a raw text frame.
///
/// Unrecognized tags are not an error; a frame that is not JSON, lacks a
/// `type`, or carries a known tag with bad fields is.
///
/// # Errors
///
/// Returns [`CambistError::MalformedMessage`] describing the first
/// problem serde hit.
pub fn decode(frame: &str) -> Result<StreamMessage> {
    serde_json::from_str(frame).map_err(|e| CambistError::MalformedMessage(e.to_string()))
}

/// A `snapshot` message.
#[derive(Debug, Clone, Deserialize)]
pub struct BookSnapshot {
    pub product_id: String,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

/// An `l2update` message.
#[derive(Debug, Clone, Deserialize)]
pub struct BookDelta {
    pub product_id: String,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    /// Not used for gap detection.
    #[serde(default)]
    pub sequence: Option<u64>,
    pub changes: Vec<LevelChange>,
}

/// A `ticker` message.
///
/// The first tick after subscribing carries only the quote and rolling
/// statistics, so the per-trade fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerTick {
    pub product_id: String,
    pub sequence: u64,
    pub price: Decimal,
    #[serde(default)]
    pub trade_id: Option<u64>,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    /// Taker side of the execution that triggered the tick.
    #[serde(default)]
    pub side: Option<Side>,
    #[serde(default)]
    pub last_size: Option<Decimal>,
    #[serde(default)]
    pub best_bid: Option<Decimal>,
    #[serde(default)]
    pub best_ask: Option<Decimal>,
    #[serde(default)]
    pub open_24h: Option<Decimal>,
    #[serde(default)]
    pub high_24h: Option<Decimal>,
    #[serde(default)]
    pub low_24h: Option<Decimal>,
    #[serde(default)]
    pub volume_24h: Option<Decimal>,
    #[serde(default)]
    pub volume_30d: Option<Decimal>,
}

/// A `match` message.
#[derive(Debug, Clone, Deserialize)]
pub struct Execution {
    pub product_id: String,
    pub trade_id: u64,
    pub sequence: u64,
    pub time: DateTime<Utc>,
    pub price: Decimal,
    pub size: Decimal,
    /// Maker side of the match.
    pub side: Side,
    pub maker_order_id: String,
    pub taker_order_id: String,

    // -- Authenticated feeds only --
    /// Account identifier; present when the match involves our account.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub taker_user_id: Option<String>,
    #[serde(default)]
    pub maker_user_id: Option<String>,
}

impl Execution {
    /// Returns `true` if the match carries a non-empty account identifier.
    pub fn is_own(&self) -> bool {
        self.user_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Returns `true` if our account took liquidity on this match.
    pub fn is_own_taker(&self) -> bool {
        match (&self.user_id, &self.taker_user_id) {
            (Some(user), Some(taker)) => !user.is_empty() && user == taker,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tags_decode_without_error() {
        let msg = decode(r#"{"type":"heartbeat","sequence":90,"last_trade_id":20}"#).unwrap();
        assert!(matches!(msg, StreamMessage::Unknown));
        assert_eq!(msg.kind(), None);
        assert_eq!(msg.product_id(), None);
    }

    #[test]
    fn missing_type_is_malformed() {
        let err = decode(r#"{"product_id":"BTC-USD"}"#).unwrap_err();
        assert!(matches!(err, CambistError::MalformedMessage(_)));
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(matches!(
            decode("not json"),
            Err(CambistError::MalformedMessage(_))
        ));
    }

    #[test]
    fn known_tag_with_bad_fields_is_malformed() {
        let err = decode(r#"{"type":"l2update","product_id":"BTC-USD","changes":[["up","1","1"]]}"#)
            .unwrap_err();
        assert!(matches!(err, CambistError::MalformedMessage(_)));
    }

    #[test]
    fn own_taker_detection() {
        let frame = r#"{
            "type": "match", "product_id": "BTC-USD", "trade_id": 1, "sequence": 2,
            "time": "2024-01-15T10:30:00.000000Z", "price": "10", "size": "1", "side": "buy",
            "maker_order_id": "m", "taker_order_id": "t",
            "user_id": "u1", "taker_user_id": "u1"
        }"#;
        let StreamMessage::Match(exec) = decode(frame).unwrap() else {
            panic!("expected match");
        };
        assert!(exec.is_own());
        assert!(exec.is_own_taker());
    }
}
