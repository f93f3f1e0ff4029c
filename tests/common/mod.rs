//! Shared test utilities and constants.

use cambist::models::product::Product;
use cambist::subscription::ProductSubscription;

/// Public Coinbase Exchange WebSocket feed URL.
pub const FEED_WS_URL: &str = "wss://ws-feed.exchange.coinbase.com";

/// A subscription declaring BTC-USD for every category.
pub fn btc_usd_subscription() -> ProductSubscription {
    ProductSubscription::builder()
        .add_all(Product::new("BTC", "USD"))
        .build()
}
