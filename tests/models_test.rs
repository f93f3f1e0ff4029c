//! Deserialization tests for feed message types.

use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;

use cambist::models::book::{LevelChange, PriceLevel};
use cambist::models::message::{MessageKind, StreamMessage, decode};
use cambist::models::{ErrorResponse, Side, SubscriptionsResponse};

const SNAPSHOT_JSON: &str = include_str!("fixtures/snapshot.json");
const L2UPDATE_JSON: &str = include_str!("fixtures/l2update.json");
const TICKER_JSON: &str = include_str!("fixtures/ticker.json");
const MATCH_JSON: &str = include_str!("fixtures/match.json");
const USER_MATCH_JSON: &str = include_str!("fixtures/user_match.json");
const SUBSCRIPTIONS_JSON: &str = include_str!("fixtures/subscriptions.json");
const HEARTBEAT_JSON: &str = include_str!("fixtures/heartbeat.json");
const ERROR_JSON: &str = include_str!("fixtures/error.json");

fn instant(s: &str) -> DateTime<Utc> {
    s.parse().expect("Failed to parse fixture time")
}

#[test]
fn test_snapshot_deserializes() {
    let message = decode(SNAPSHOT_JSON).expect("Failed to decode snapshot");
    assert_eq!(message.kind(), Some(MessageKind::Snapshot));
    assert_eq!(message.product_id(), Some("BTC-USD"));
    assert_eq!(message.time(), Some(instant("2024-01-15T10:30:00.123456Z")));

    let StreamMessage::Snapshot(snapshot) = message else {
        panic!("expected snapshot");
    };
    assert_eq!(snapshot.bids.len(), 2);
    assert_eq!(snapshot.bids[0], PriceLevel::new(dec!(42150.00), dec!(1.5)));
    assert_eq!(snapshot.asks.len(), 2);
    assert_eq!(snapshot.asks[1], PriceLevel::new(dec!(42156.10), dec!(2.0)));
}

#[test]
fn test_snapshot_without_time() {
    let message =
        decode(r#"{"type":"snapshot","product_id":"BTC-USD","bids":[],"asks":[]}"#).unwrap();
    assert_eq!(message.time(), None);
}

#[test]
fn test_l2update_deserializes() {
    let message = decode(L2UPDATE_JSON).expect("Failed to decode l2update");
    assert_eq!(message.kind(), Some(MessageKind::Delta));

    let StreamMessage::Delta(delta) = message else {
        panic!("expected delta");
    };
    assert_eq!(delta.product_id, "BTC-USD");
    assert_eq!(delta.sequence, None);
    assert_eq!(
        delta.changes,
        vec![
            LevelChange {
                side: Side::Buy,
                price: dec!(42150.00),
                size: dec!(0),
            },
            LevelChange {
                side: Side::Sell,
                price: dec!(42155.00),
                size: dec!(0.5),
            },
            LevelChange {
                side: Side::Buy,
                price: dec!(42151.00),
                size: dec!(3.1),
            },
        ]
    );
}

#[test]
fn test_ticker_deserializes() {
    let message = decode(TICKER_JSON).expect("Failed to decode ticker");
    assert_eq!(message.kind(), Some(MessageKind::TickerTick));

    let StreamMessage::Ticker(tick) = message else {
        panic!("expected ticker");
    };
    assert_eq!(tick.sequence, 37475248783);
    assert_eq!(tick.trade_id, Some(987654321));
    assert_eq!(tick.price, dec!(42152.00));
    assert_eq!(tick.best_bid, Some(dec!(42150.50)));
    assert_eq!(tick.best_ask, Some(dec!(42155.00)));
    assert_eq!(tick.last_size, Some(dec!(0.5)));
    assert_eq!(tick.volume_24h, Some(dec!(1250.5)));
    assert_eq!(tick.volume_30d, Some(dec!(40125.75)));
    assert_eq!(tick.side, Some(Side::Sell));
}

#[test]
fn test_initial_ticker_without_trade_fields() {
    let message = decode(
        r#"{"type":"ticker","sequence":5,"product_id":"BTC-USD","price":"100","best_bid":"99","best_ask":"101"}"#,
    )
    .unwrap();

    let StreamMessage::Ticker(tick) = message else {
        panic!("expected ticker");
    };
    assert_eq!(tick.trade_id, None);
    assert_eq!(tick.time, None);
    assert_eq!(tick.side, None);
}

#[test]
fn test_match_deserializes() {
    let message = decode(MATCH_JSON).expect("Failed to decode match");
    assert_eq!(message.kind(), Some(MessageKind::Execution));

    let StreamMessage::Match(exec) = message else {
        panic!("expected match");
    };
    assert_eq!(exec.trade_id, 987654321);
    assert_eq!(exec.sequence, 37475248784);
    assert_eq!(exec.price, dec!(42152.00));
    assert_eq!(exec.size, dec!(0.5));
    assert_eq!(exec.side, Side::Buy);
    assert_eq!(exec.time, instant("2024-01-15T10:30:00.123456Z"));
    assert!(!exec.is_own());
}

#[test]
fn test_user_match_deserializes() {
    let StreamMessage::Match(exec) = decode(USER_MATCH_JSON).unwrap() else {
        panic!("expected match");
    };
    assert_eq!(exec.user_id.as_deref(), Some("5844eceecf7e803e259d0365"));
    assert!(exec.is_own());
    assert!(exec.is_own_taker());
}

#[test]
fn test_heartbeat_is_unknown() {
    let message = decode(HEARTBEAT_JSON).expect("Failed to decode heartbeat");
    assert!(matches!(message, StreamMessage::Unknown));
    assert_eq!(message.product_id(), None);
}

#[test]
fn test_last_match_is_unknown() {
    let message = decode(&MATCH_JSON.replace("\"match\"", "\"last_match\"")).unwrap();
    assert!(matches!(message, StreamMessage::Unknown));
}

#[test]
fn test_match_missing_price_is_malformed() {
    let mut value: serde_json::Value = serde_json::from_str(MATCH_JSON).unwrap();
    value.as_object_mut().unwrap().remove("price");
    assert!(decode(&value.to_string()).is_err());
}

#[test]
fn test_subscriptions_response_deserializes() {
    let response: SubscriptionsResponse =
        serde_json::from_str(SUBSCRIPTIONS_JSON).expect("Failed to deserialize subscriptions");

    assert_eq!(response.channels.len(), 3);
    assert_eq!(response.channels[1].name, "ticker");
    assert_eq!(response.channels[1].product_ids, vec!["BTC-USD", "ETH-USD"]);
}

#[test]
fn test_error_response_deserializes() {
    let response: ErrorResponse =
        serde_json::from_str(ERROR_JSON).expect("Failed to deserialize error");

    assert_eq!(response.message, "Failed to subscribe");
    assert_eq!(
        response.reason.as_deref(),
        Some("ETH-XYZ is not a valid product")
    );
}
