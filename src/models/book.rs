//! Order book models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Side;
use super::product::Product;

/// A single price level in the order book.
///
/// On the wire a level is a `[price, size]` pair of decimal strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Decimal,
    /// Quantity remaining at this price.
    pub size: Decimal,
}

impl PriceLevel {
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }
}

/// One entry of an `l2update` (`[side, price, size]` on the wire).
///
/// A size of zero removes the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LevelChange {
    pub side: Side,
    pub price: Decimal,
    pub size: Decimal,
}

/// A depth-limited, timestamped view of a product's book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBook {
    pub instrument: Product,
    /// Time of the message that produced this view, if it carried one.
    pub timestamp: Option<DateTime<Utc>>,
    /// Highest price first.
    pub bids: Vec<PriceLevel>,
    /// Lowest price first.
    pub asks: Vec<PriceLevel>,
}

impl OrderBook {
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Best ask minus best bid, when both sides are populated.
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.price - bid.price),
            _ => None,
        }
    }
}
