use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;
use tokio::time::timeout;

use cambist::feed::ChannelHub;
use cambist::models::Side;
use cambist::models::product::Product;
use cambist::stream::MarketDataService;
use cambist::subscription::ProductSubscription;

const TICKER_JSON: &str = include_str!("fixtures/ticker.json");
const MATCH_JSON: &str = include_str!("fixtures/match.json");

fn service(hub: &ChannelHub) -> MarketDataService<ChannelHub> {
    let subscription = ProductSubscription::builder()
        .add_ticker(Product::new("BTC", "USD"))
        .build();
    MarketDataService::new(hub.clone(), subscription)
}

#[tokio::test]
async fn ticker_stream_normalizes_ticks() {
    let hub = ChannelHub::new();
    let mut tickers = service(&hub).ticker(&Product::new("BTC", "USD")).unwrap();

    hub.publish("BTC-USD", MATCH_JSON);
    hub.publish("BTC-USD", TICKER_JSON);

    let ticker = timeout(Duration::from_secs(2), tickers.recv())
        .await
        .expect("Timed out waiting for ticker")
        .unwrap()
        .unwrap();

    let expected_time: DateTime<Utc> = "2024-01-15T10:30:00.123456Z".parse().unwrap();
    assert_eq!(ticker.instrument, Product::new("BTC", "USD"));
    assert_eq!(ticker.last, dec!(42152.00));
    assert_eq!(ticker.bid, Some(dec!(42150.50)));
    assert_eq!(ticker.ask, Some(dec!(42155.00)));
    assert_eq!(ticker.open, Some(dec!(41800.00)));
    assert_eq!(ticker.high, Some(dec!(42500.00)));
    assert_eq!(ticker.low, Some(dec!(41750.00)));
    assert_eq!(ticker.volume, Some(dec!(1250.5)));
    assert_eq!(ticker.timestamp, Some(expected_time));
}

#[tokio::test]
async fn raw_ticker_stream_keeps_sequence() {
    let hub = ChannelHub::new();
    let mut raw = service(&hub)
        .raw_ticker(&Product::new("BTC", "USD"))
        .unwrap();

    hub.publish("BTC-USD", TICKER_JSON);

    let tick = timeout(Duration::from_secs(2), raw.recv())
        .await
        .expect("Timed out waiting for raw ticker")
        .unwrap()
        .unwrap();

    assert_eq!(tick.sequence, 37475248783);
    assert_eq!(tick.trade_id, Some(987654321));
    assert_eq!(tick.size, Some(dec!(0.5)));
    assert_eq!(tick.side, Some(Side::Sell));
}

#[tokio::test]
async fn ticker_streams_are_independent() {
    let hub = ChannelHub::new();
    let service = service(&hub);
    let product = Product::new("BTC", "USD");
    let mut a = service.ticker(&product).unwrap();
    let mut b = service.ticker(&product).unwrap();

    hub.publish("BTC-USD", TICKER_JSON);
    let first = timeout(Duration::from_secs(2), a.recv())
        .await
        .expect("Timed out waiting for ticker");
    assert!(matches!(first, Some(Ok(_))));
    drop(a);

    let ticker = timeout(Duration::from_secs(2), b.recv())
        .await
        .expect("Timed out waiting for ticker")
        .unwrap()
        .unwrap();
    assert_eq!(ticker.last, dec!(42152.00));
}
