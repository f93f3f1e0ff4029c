//! Live integration tests against the public exchange feed.
//!
//! These tests connect to the real WebSocket API and require network access.
//! Run with: `cargo test --features integration-tests`

#![cfg(feature = "integration-tests")]

mod common;

use futures_util::StreamExt;
use tokio::time::{Duration, timeout};

use cambist::feed::ChannelHub;
use cambist::models::product::Product;
use cambist::models::{Channel, ChannelSpec};
use cambist::stream::MarketDataService;
use cambist::websocket::{connect, process_messages, subscribe, subscribe_all, unsubscribe};

use common::{FEED_WS_URL, btc_usd_subscription};

#[tokio::test]
async fn test_connect_to_feed() {
    let result = connect(FEED_WS_URL).await;
    assert!(result.is_ok(), "Failed to connect to feed");
}

#[tokio::test]
async fn test_subscribe_and_receive_ticker_frame() {
    let (mut write, mut read) = connect(FEED_WS_URL).await.expect("Failed to connect");
    let channels = vec![ChannelSpec::new(Channel::Ticker, &[Product::new("BTC", "USD")])];

    subscribe(&mut write, channels.clone(), None)
        .await
        .expect("Failed to subscribe to ticker");

    let received = timeout(Duration::from_secs(10), async {
        while let Some(msg) = read.next().await {
            if let Ok(tungstenite::Message::Text(text)) = msg {
                if text.contains("\"type\":\"ticker\"") {
                    return true;
                }
            }
        }
        false
    })
    .await
    .expect("Timeout waiting for ticker");
    assert!(received, "Did not receive ticker frame");

    unsubscribe(&mut write, channels)
        .await
        .expect("Failed to unsubscribe from ticker");
}

#[tokio::test]
async fn test_order_book_stream_from_live_feed() {
    let (mut write, mut read) = connect(FEED_WS_URL).await.expect("Failed to connect");
    let subscription = btc_usd_subscription();
    let hub = ChannelHub::new();
    let service = MarketDataService::new(hub.clone(), subscription.clone());
    let mut books = service
        .order_book(&Product::new("BTC", "USD"), Some(10))
        .expect("BTC-USD declared for order books");

    subscribe_all(&mut write, &subscription, None)
        .await
        .expect("Failed to subscribe");
    let reader_hub = hub.clone();
    let reader = tokio::spawn(async move { process_messages(&mut read, &reader_hub).await });

    let book = timeout(Duration::from_secs(15), books.next())
        .await
        .expect("Timeout waiting for order book")
        .expect("Stream ended before a book arrived")
        .expect("Order book stream failed");

    assert!(book.bids.len() <= 10);
    assert!(book.asks.len() <= 10);
    if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
        assert!(bid.price < ask.price, "Book is crossed");
    }

    hub.close_all();
    reader.abort();
}
