//! Per-product market data streams.
//!
//! This module is organized by stage:
//! - [`router`] - Capability checks and message filtering
//! - [`book`] - Order book reconstruction
//! - [`ticker`] - Ticker synthesis
//! - [`trades`] - Execution-to-trade mapping
//!
//! Every stream request first verifies the product/category pair, then
//! spawns one producer task that owns all state for that stream. The task
//! decodes raw frames, drops anything the route does not accept, maps the
//! rest, and pushes results onto a bounded queue read by the returned
//! [`MarketStream`]. The first error item ends the stream. Dropping the
//! stream stops the producer.

pub mod book;
pub mod router;
pub mod ticker;
pub mod trades;

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::Result;
use crate::feed::ChannelSubscriber;
use crate::models::book::OrderBook;
use crate::models::message::{RawFrame, StreamMessage, decode};
use crate::models::product::Product;
use crate::models::ticker::{RawTicker, Ticker};
use crate::models::trade::Trade;
use crate::subscription::{Category, ProductSubscription};

pub use book::{DEFAULT_MAX_DEPTH, OrderBookAggregator, OrderBookState};
pub use router::{Route, route};
pub use ticker::TickerSynthesizer;
pub use trades::{TradeAdapter, TradeMapper, VenueTradeAdapter};

/// Queue capacity used when none is configured.
pub const DEFAULT_STREAM_BUFFER: usize = 1024;

/// A lazy, non-restartable sequence of market data items.
///
/// Ends on upstream channel closure or right after yielding an error.
/// Dropping it stops the producer task; no state is mutated afterwards.
pub struct MarketStream<T> {
    rx: mpsc::Receiver<Result<T>>,
    task: JoinHandle<()>,
}

impl<T> MarketStream<T> {
    /// Receives the next item, or `None` once the stream has ended.
    pub async fn recv(&mut self) -> Option<Result<T>> {
        self.rx.recv().await
    }
}

impl<T> Stream for MarketStream<T> {
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl<T> Drop for MarketStream<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Entry point for requesting order book, ticker, and trade streams.
///
/// Stream methods spawn Tokio tasks and must be called from within a
/// Tokio runtime.
pub struct MarketDataService<S> {
    subscriber: S,
    subscription: ProductSubscription,
    stream_buffer: usize,
}

impl<S: ChannelSubscriber> MarketDataService<S> {
    pub fn new(subscriber: S, subscription: ProductSubscription) -> Self {
        Self {
            subscriber,
            subscription,
            stream_buffer: DEFAULT_STREAM_BUFFER,
        }
    }

    /// Sets the per-stream queue capacity (at least one).
    #[must_use]
    pub fn with_stream_buffer(mut self, stream_buffer: usize) -> Self {
        self.stream_buffer = stream_buffer.max(1);
        self
    }

    pub fn subscription(&self) -> &ProductSubscription {
        &self.subscription
    }

    /// Streams the reconstructed book for `product`, rendered to at most
    /// `max_depth` levels per side (100 when `None`).
    ///
    /// Each call owns a fresh book that starts empty and waits for a
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`CambistError::NotSubscribed`](crate::CambistError::NotSubscribed)
    /// if `product` was not declared for order books.
    pub fn order_book(
        &self,
        product: &Product,
        max_depth: Option<usize>,
    ) -> Result<MarketStream<OrderBook>> {
        let route = route(&self.subscription, product, Category::OrderBook)?;
        let mut aggregator = OrderBookAggregator::new(product.clone(), max_depth);

        Ok(self.spawn(route, move |message| Ok(aggregator.handle(&message))))
    }

    /// Streams raw ticker facts, including best bid/ask and sequence.
    ///
    /// # Errors
    ///
    /// Returns [`CambistError::NotSubscribed`](crate::CambistError::NotSubscribed)
    /// if `product` was not declared for tickers.
    pub fn raw_ticker(&self, product: &Product) -> Result<MarketStream<RawTicker>> {
        let route = route(&self.subscription, product, Category::Ticker)?;
        let synthesizer = TickerSynthesizer::new(product.clone());

        Ok(self.spawn(route, move |message| match message {
            StreamMessage::Ticker(tick) => Ok(Some(synthesizer.raw(&tick))),
            _ => Ok(None),
        }))
    }

    /// Streams normalized tickers.
    ///
    /// # Errors
    ///
    /// Returns [`CambistError::NotSubscribed`](crate::CambistError::NotSubscribed)
    /// if `product` was not declared for tickers.
    pub fn ticker(&self, product: &Product) -> Result<MarketStream<Ticker>> {
        let route = route(&self.subscription, product, Category::Ticker)?;
        let synthesizer = TickerSynthesizer::new(product.clone());

        Ok(self.spawn(route, move |message| match message {
            StreamMessage::Ticker(tick) => Ok(Some(synthesizer.normalize(&tick))),
            _ => Ok(None),
        }))
    }

    /// Streams trades, one per execution, distinguishing own fills.
    ///
    /// On an authenticated connection an own match arrives on both the
    /// public and the `user` channel, so it is emitted twice with the same
    /// id, once with `own_fill` unset and once with it set.
    ///
    /// # Errors
    ///
    /// Returns [`CambistError::NotSubscribed`](crate::CambistError::NotSubscribed)
    /// if `product` was not declared for trades.
    pub fn trades(&self, product: &Product) -> Result<MarketStream<Trade>> {
        self.trades_with_adapter(product, VenueTradeAdapter)
    }

    /// Like [`trades`](Self::trades), mapping through a custom adapter.
    ///
    /// # Errors
    ///
    /// Returns [`CambistError::NotSubscribed`](crate::CambistError::NotSubscribed)
    /// if `product` was not declared for trades.
    pub fn trades_with_adapter<A>(
        &self,
        product: &Product,
        adapter: A,
    ) -> Result<MarketStream<Trade>>
    where
        A: TradeAdapter + Send + 'static,
    {
        let route = route(&self.subscription, product, Category::Trades)?;
        let mapper = TradeMapper::new(product.clone(), adapter);

        Ok(self.spawn(route, move |message| match message {
            StreamMessage::Match(execution) => mapper.map(execution).map(Some),
            _ => Ok(None),
        }))
    }

    fn spawn<T, F>(&self, route: Route, handle: F) -> MarketStream<T>
    where
        T: Send + 'static,
        F: FnMut(StreamMessage) -> Result<Option<T>> + Send + 'static,
    {
        let frames = self.subscriber.subscribe_channel(route.channel());
        let (tx, rx) = mpsc::channel(self.stream_buffer);
        let task = tokio::spawn(run_pipeline(frames, route, tx, handle));

        MarketStream { rx, task }
    }
}

/// Drives one stream until upstream closes, the consumer goes away, or an
/// error is delivered.
async fn run_pipeline<T, F>(
    mut frames: mpsc::UnboundedReceiver<RawFrame>,
    route: Route,
    tx: mpsc::Sender<Result<T>>,
    mut handle: F,
) where
    F: FnMut(StreamMessage) -> Result<Option<T>>,
{
    while let Some(frame) = frames.recv().await {
        let outcome = decode(&frame).and_then(|message| {
            if route.accepts(&message) {
                handle(message)
            } else {
                trace!(channel = route.channel(), "Dropping unrouted message");
                Ok(None)
            }
        });

        match outcome {
            Ok(Some(item)) => {
                if tx.send(Ok(item)).await.is_err() {
                    debug!(
                        channel = route.channel(),
                        category = %route.category(),
                        "Consumer dropped stream"
                    );
                    return;
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(
                    channel = route.channel(),
                    category = %route.category(),
                    error = %e,
                    "Terminating stream"
                );
                let _ = tx.send(Err(e)).await;
                return;
            }
        }
    }

    debug!(
        channel = route.channel(),
        category = %route.category(),
        "Upstream channel closed"
    );
}
