//! Level-2 order book reconstruction.
//!
//! One [`OrderBookAggregator`] is owned by each order book stream. It is
//! created empty when the stream is requested, rebuilt from scratch on
//! every snapshot, mutated in place by every delta, and dropped with the
//! stream. Sequence numbers are not checked: a missed delta leaves the
//! book out of sync until the next snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::adapters::adapt_order_book;
use crate::models::Side;
use crate::models::book::{LevelChange, OrderBook, PriceLevel};
use crate::models::message::StreamMessage;
use crate::models::product::Product;

/// Depth rendered when the caller does not ask for one.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Full-depth book for one product.
///
/// Both sides are keyed by price, so a price can appear at most once per
/// side. Bids are read highest first, asks lowest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBookState {
    bids: BTreeMap<Decimal, Decimal>,
    asks: BTreeMap<Decimal, Decimal>,
}

impl OrderBookState {
    /// Empties both sides.
    pub fn reset(&mut self) {
        self.bids.clear();
        self.asks.clear();
    }

    /// Inserts or replaces the level at `price`, or removes it when `size`
    /// is not positive. Removing an absent level is a no-op.
    pub fn apply(&mut self, side: Side, price: Decimal, size: Decimal) {
        let levels = match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        };

        if size > Decimal::ZERO {
            levels.insert(price, size);
        } else {
            levels.remove(&price);
        }
    }

    /// Bid levels, highest price first.
    pub fn bids(&self) -> impl Iterator<Item = PriceLevel> + '_ {
        self.bids
            .iter()
            .rev()
            .map(|(price, size)| PriceLevel::new(*price, *size))
    }

    /// Ask levels, lowest price first.
    pub fn asks(&self) -> impl Iterator<Item = PriceLevel> + '_ {
        self.asks
            .iter()
            .map(|(price, size)| PriceLevel::new(*price, *size))
    }

    pub fn bid_depth(&self) -> usize {
        self.bids.len()
    }

    pub fn ask_depth(&self) -> usize {
        self.asks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

/// Owns the book state of a single order book subscription.
#[derive(Debug)]
pub struct OrderBookAggregator {
    product: Product,
    max_depth: usize,
    /// `None` until the first snapshot arrives.
    state: Option<OrderBookState>,
}

impl OrderBookAggregator {
    /// Creates an aggregator rendering at most `max_depth` levels per side
    /// ([`DEFAULT_MAX_DEPTH`] when `None`).
    pub fn new(product: Product, max_depth: Option<usize>) -> Self {
        Self {
            product,
            max_depth: max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            state: None,
        }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Current full-depth state, if a snapshot has been applied.
    pub fn state(&self) -> Option<&OrderBookState> {
        self.state.as_ref()
    }

    /// Replaces any prior state with an empty book, then loads the levels.
    pub fn apply_snapshot(&mut self, bids: &[PriceLevel], asks: &[PriceLevel]) {
        let state = self.state.get_or_insert_with(OrderBookState::default);
        state.reset();

        for level in bids {
            state.apply(Side::Buy, level.price, level.size);
        }
        for level in asks {
            state.apply(Side::Sell, level.price, level.size);
        }

        debug!(
            product = %self.product,
            bids = state.bid_depth(),
            asks = state.ask_depth(),
            "Applied book snapshot"
        );
    }

    /// Applies level changes in order. Returns `false`, leaving nothing
    /// changed, if no snapshot has been applied yet.
    pub fn apply_delta(&mut self, changes: &[LevelChange]) -> bool {
        let Some(state) = self.state.as_mut() else {
            debug!(product = %self.product, "Dropping book delta received before snapshot");
            return false;
        };

        for change in changes {
            state.apply(change.side, change.price, change.size);
        }

        trace!(product = %self.product, changes = changes.len(), "Applied book delta");
        true
    }

    /// Renders the top `max_depth` levels per side without mutating state.
    /// Returns `None` before the first snapshot.
    pub fn render(&self, timestamp: Option<DateTime<Utc>>) -> Option<OrderBook> {
        self.render_depth(self.max_depth, timestamp)
    }

    /// Like [`render`](Self::render) with an explicit depth.
    pub fn render_depth(
        &self,
        max_depth: usize,
        timestamp: Option<DateTime<Utc>>,
    ) -> Option<OrderBook> {
        let state = self.state.as_ref()?;
        let bids = state.bids().take(max_depth).collect();
        let asks = state.asks().take(max_depth).collect();

        Some(adapt_order_book(bids, asks, &self.product, timestamp))
    }

    /// Applies a routed book message and renders the result.
    ///
    /// Non-book messages and deltas before the first snapshot yield `None`.
    pub fn handle(&mut self, message: &StreamMessage) -> Option<OrderBook> {
        match message {
            StreamMessage::Snapshot(snapshot) => {
                self.apply_snapshot(&snapshot.bids, &snapshot.asks);
            }
            StreamMessage::Delta(delta) => {
                if !self.apply_delta(&delta.changes) {
                    return None;
                }
            }
            StreamMessage::Ticker(_) | StreamMessage::Match(_) | StreamMessage::Unknown => {
                return None;
            }
        }

        self.render(message.time())
    }
}
