//! Ticker synthesis from per-execution ticks.

use crate::adapters::{adapt_raw_ticker, adapt_ticker, adapt_ticker_stats};
use crate::models::message::TickerTick;
use crate::models::product::Product;
use crate::models::ticker::{RawTicker, Ticker};

/// Builds raw and normalized tickers for one product.
///
/// Stateless: every tick already carries the quote and rolling stats.
#[derive(Debug, Clone)]
pub struct TickerSynthesizer {
    product: Product,
}

impl TickerSynthesizer {
    pub fn new(product: Product) -> Self {
        Self { product }
    }

    /// The raw fact, including fields the normalized ticker drops.
    pub fn raw(&self, tick: &TickerTick) -> RawTicker {
        adapt_raw_ticker(tick)
    }

    pub fn normalize(&self, tick: &TickerTick) -> Ticker {
        adapt_ticker(&self.raw(tick), &adapt_ticker_stats(tick), &self.product)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::Side;
    use crate::models::message::{StreamMessage, decode};

    const TICK: &str = r#"{
        "type": "ticker",
        "sequence": 3262786978,
        "product_id": "BTC-USD",
        "price": "4388.01",
        "open_24h": "4300.00",
        "volume_24h": "12345.6",
        "low_24h": "4250.00",
        "high_24h": "4400.00",
        "volume_30d": "99999.9",
        "best_bid": "4388",
        "best_ask": "4388.01",
        "side": "buy",
        "time": "2017-09-02T17:05:49.250000Z",
        "trade_id": 20153558,
        "last_size": "0.03"
    }"#;

    fn tick() -> TickerTick {
        match decode(TICK).unwrap() {
            StreamMessage::Ticker(tick) => tick,
            other => panic!("expected ticker, got {other:?}"),
        }
    }

    #[test]
    fn raw_ticker_keeps_sequence_and_quote() {
        let synth = TickerSynthesizer::new(Product::new("BTC", "USD"));
        let raw = synth.raw(&tick());

        assert_eq!(raw.trade_id, Some(20153558));
        assert_eq!(raw.sequence, 3262786978);
        assert_eq!(raw.price, dec!(4388.01));
        assert_eq!(raw.size, Some(dec!(0.03)));
        assert_eq!(raw.bid, Some(dec!(4388)));
        assert_eq!(raw.ask, Some(dec!(4388.01)));
        assert_eq!(raw.volume, Some(dec!(12345.6)));
        assert_eq!(raw.side, Some(Side::Buy));
    }

    #[test]
    fn normalized_ticker_combines_stats() {
        let synth = TickerSynthesizer::new(Product::new("BTC", "USD"));
        let ticker = synth.normalize(&tick());

        assert_eq!(ticker.instrument, Product::new("BTC", "USD"));
        assert_eq!(ticker.last, dec!(4388.01));
        assert_eq!(ticker.bid, Some(dec!(4388)));
        assert_eq!(ticker.ask, Some(dec!(4388.01)));
        assert_eq!(ticker.open, Some(dec!(4300.00)));
        assert_eq!(ticker.high, Some(dec!(4400.00)));
        assert_eq!(ticker.low, Some(dec!(4250.00)));
        assert_eq!(ticker.volume, Some(dec!(12345.6)));
        let expected: DateTime<Utc> = "2017-09-02T17:05:49.25Z".parse().unwrap();
        assert_eq!(ticker.timestamp, Some(expected));
    }
}
