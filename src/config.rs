//! Application configuration loaded from environment variables.
//!
//! Products are declared per category as comma-separated lists:
//! - `CAMBIST_PRODUCTS`: products subscribed for every category
//! - `CAMBIST_ORDERBOOK_PRODUCTS`, `CAMBIST_TICKER_PRODUCTS`,
//!   `CAMBIST_TRADE_PRODUCTS`: per-category additions
//!
//! When none is set, `BTC-USD` is subscribed for everything.
//!
//! Optional settings: `CAMBIST_WEBSOCKET_URL`, `CAMBIST_BOOK_DEPTH`,
//! `CAMBIST_STREAM_BUFFER`. Credentials for authenticated (own fill)
//! subscriptions come from `CAMBIST_API_KEY`, `CAMBIST_API_SECRET`, and
//! `CAMBIST_API_PASSPHRASE`, all or none.

use zeroize::Zeroizing;

use crate::auth::Credentials;
use crate::error::CambistError;
use crate::models::product::Product;
use crate::stream::{DEFAULT_MAX_DEPTH, DEFAULT_STREAM_BUFFER};
use crate::subscription::ProductSubscription;

/// Default public WebSocket endpoint.
const DEFAULT_WEBSOCKET_URL: &str = "wss://ws-feed.exchange.coinbase.com";

/// Product subscribed when no product variable is set.
const DEFAULT_PRODUCT: &str = "BTC-USD";

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub feed: FeedConfig,
}

/// Feed connection and stream settings.
#[derive(Debug)]
pub struct FeedConfig {
    pub websocket_url: String,
    pub subscription: ProductSubscription,
    /// Levels per side rendered on each order book.
    pub book_depth: usize,
    /// Per-stream queue capacity.
    pub stream_buffer: usize,
    pub credentials: Option<Credentials>,
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`CambistError::Config`] if a product or numeric setting cannot
/// be parsed, or if only some of the credential variables are set.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let websocket_url = non_empty_var("CAMBIST_WEBSOCKET_URL")
        .unwrap_or_else(|| DEFAULT_WEBSOCKET_URL.to_string());

    Ok(AppConfig {
        feed: FeedConfig {
            websocket_url,
            subscription: load_subscription()?,
            book_depth: positive_var("CAMBIST_BOOK_DEPTH", DEFAULT_MAX_DEPTH)?,
            stream_buffer: positive_var("CAMBIST_STREAM_BUFFER", DEFAULT_STREAM_BUFFER)?,
            credentials: load_credentials()?,
        },
    })
}

fn load_subscription() -> crate::Result<ProductSubscription> {
    let all = product_list("CAMBIST_PRODUCTS")?;
    let order_book = product_list("CAMBIST_ORDERBOOK_PRODUCTS")?;
    let ticker = product_list("CAMBIST_TICKER_PRODUCTS")?;
    let trades = product_list("CAMBIST_TRADE_PRODUCTS")?;

    let mut builder = ProductSubscription::builder();
    if all.is_empty() && order_book.is_empty() && ticker.is_empty() && trades.is_empty() {
        return Ok(builder.add_all(DEFAULT_PRODUCT.parse()?).build());
    }

    for product in all {
        builder = builder.add_all(product);
    }
    for product in order_book {
        builder = builder.add_order_book(product);
    }
    for product in ticker {
        builder = builder.add_ticker(product);
    }
    for product in trades {
        builder = builder.add_trades(product);
    }

    Ok(builder.build())
}

fn load_credentials() -> crate::Result<Option<Credentials>> {
    let key = non_empty_var("CAMBIST_API_KEY");
    let secret = non_empty_var("CAMBIST_API_SECRET").map(Zeroizing::new);
    let passphrase = non_empty_var("CAMBIST_API_PASSPHRASE").map(Zeroizing::new);

    match (key, secret, passphrase) {
        (Some(key), Some(secret), Some(passphrase)) => Ok(Some(Credentials {
            key,
            secret,
            passphrase,
        })),
        (None, None, None) => Ok(None),
        (key, secret, passphrase) => {
            let missing: Vec<&str> = [
                ("CAMBIST_API_KEY", key.is_none()),
                ("CAMBIST_API_SECRET", secret.is_none()),
                ("CAMBIST_API_PASSPHRASE", passphrase.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();

            Err(CambistError::Config(format!(
                "partial API credentials, missing {}",
                missing.join(", ")
            )))
        }
    }
}

/// Parses a comma-separated product list, skipping blank entries.
fn product_list(name: &str) -> crate::Result<Vec<Product>> {
    let Some(raw) = non_empty_var(name) else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Product>()
                .map_err(|_| CambistError::Config(format!("{name}: invalid product '{s}'")))
        })
        .collect()
}

/// Parses a positive integer variable, falling back to `default`.
fn positive_var(name: &str, default: usize) -> crate::Result<usize> {
    let Some(raw) = non_empty_var(name) else {
        return Ok(default);
    };

    match raw.trim().parse::<usize>() {
        Ok(0) => Err(CambistError::Config(format!("{name} must be at least 1"))),
        Ok(value) => Ok(value),
        Err(e) => Err(CambistError::Config(format!("{name}: {e}"))),
    }
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
