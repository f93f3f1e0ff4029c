//! Conversions from venue messages into normalized market data values.
//!
//! These functions are pure: they never touch book state and never fail.
//! Trade adapters take slices and return collections so that callers can
//! enforce their own cardinality contracts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::book::{OrderBook, PriceLevel};
use crate::models::message::{Execution, TickerTick};
use crate::models::product::Product;
use crate::models::ticker::{RawTicker, Ticker, TickerStats};
use crate::models::trade::Trade;

/// Builds a normalized book from already ordered, already truncated levels.
pub fn adapt_order_book(
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
    product: &Product,
    timestamp: Option<DateTime<Utc>>,
) -> OrderBook {
    OrderBook {
        instrument: product.clone(),
        timestamp,
        bids,
        asks,
    }
}

/// Extracts the raw quote/trade fact from a ticker tick.
pub fn adapt_raw_ticker(tick: &TickerTick) -> RawTicker {
    RawTicker {
        trade_id: tick.trade_id,
        price: tick.price,
        size: tick.last_size,
        bid: tick.best_bid,
        ask: tick.best_ask,
        volume: tick.volume_24h,
        time: tick.time,
        side: tick.side,
        sequence: tick.sequence,
    }
}

/// Extracts the rolling statistics carried by a ticker tick.
pub fn adapt_ticker_stats(tick: &TickerTick) -> TickerStats {
    TickerStats {
        open: tick.open_24h,
        high: tick.high_24h,
        low: tick.low_24h,
        volume: tick.volume_24h,
        volume_30d: tick.volume_30d,
    }
}

/// Combines a raw ticker fact with rolling statistics.
pub fn adapt_ticker(raw: &RawTicker, stats: &TickerStats, product: &Product) -> Ticker {
    Ticker {
        instrument: product.clone(),
        last: raw.price,
        bid: raw.bid,
        ask: raw.ask,
        open: stats.open,
        high: stats.high,
        low: stats.low,
        volume: stats.volume.or(raw.volume),
        timestamp: raw.time,
    }
}

/// Maps public executions to trades for `product`.
///
/// The venue reports the maker's side on a match; public trades keep it
/// as reported.
pub fn adapt_public_trades(executions: &[Execution], product: &Product) -> Vec<Trade> {
    executions
        .iter()
        .map(|exec| Trade {
            id: exec.trade_id.to_string(),
            instrument: product.clone(),
            price: exec.price,
            size: exec.size,
            side: exec.side,
            timestamp: exec.time,
            own_fill: false,
            order_id: None,
        })
        .collect()
}

/// Maps executions on our own account to fills.
///
/// The instrument comes from each execution's product id. Executions with
/// an unparsable product id are skipped. When our account was the taker
/// the side is flipped and the taker order id is reported; otherwise the
/// maker order id is.
pub fn adapt_own_fills(executions: &[Execution]) -> Vec<Trade> {
    executions
        .iter()
        .filter_map(|exec| {
            let instrument = match exec.product_id.parse::<Product>() {
                Ok(product) => product,
                Err(e) => {
                    warn!(product_id = exec.product_id, error = %e, "Skipping fill");
                    return None;
                }
            };

            let (side, order_id) = if exec.is_own_taker() {
                (exec.side.opposite(), exec.taker_order_id.clone())
            } else {
                (exec.side, exec.maker_order_id.clone())
            };

            Some(Trade {
                id: exec.trade_id.to_string(),
                instrument,
                price: exec.price,
                size: exec.size,
                side,
                timestamp: exec.time,
                own_fill: true,
                order_id: Some(order_id),
            })
        })
        .collect()
}

/// Notional of a trade (`price * size`).
pub fn notional(trade: &Trade) -> Decimal {
    trade.price * trade.size
}
