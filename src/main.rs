use futures_util::StreamExt;
use tracing::{error, info, warn};

use cambist::CambistError;
use cambist::adapters::notional;
use cambist::config::fetch_config;
use cambist::feed::ChannelHub;
use cambist::stream::MarketDataService;
use cambist::websocket::{connect, process_messages, subscribe_all};

#[tokio::main]
async fn main() -> Result<(), CambistError> {
    // Initialize tracing subscriber for logging output.
    tracing_subscriber::fmt::init();

    let app_config = fetch_config()?;
    let feed = app_config.feed;

    let (mut write, mut read) = connect(&feed.websocket_url).await?;

    let hub = ChannelHub::new();
    let service = MarketDataService::new(hub.clone(), feed.subscription.clone())
        .with_stream_buffer(feed.stream_buffer);

    // Open every stream before subscribing so the first snapshot is seen.
    let mut consumers = Vec::new();
    for product in feed.subscription.order_book() {
        let mut books = service.order_book(product, Some(feed.book_depth))?;
        consumers.push(tokio::spawn(async move {
            while let Some(item) = books.next().await {
                match item {
                    Ok(book) => info!(
                        instrument = %book.instrument,
                        best_bid = ?book.best_bid().map(|l| l.price),
                        best_ask = ?book.best_ask().map(|l| l.price),
                        spread = ?book.spread(),
                        "Order book"
                    ),
                    Err(e) => error!(error = %e, "Order book stream failed"),
                }
            }
        }));
    }
    for product in feed.subscription.ticker() {
        let mut tickers = service.ticker(product)?;
        consumers.push(tokio::spawn(async move {
            while let Some(item) = tickers.next().await {
                match item {
                    Ok(ticker) => info!(
                        instrument = %ticker.instrument,
                        last = %ticker.last,
                        bid = ?ticker.bid,
                        ask = ?ticker.ask,
                        volume = ?ticker.volume,
                        "Ticker"
                    ),
                    Err(e) => error!(error = %e, "Ticker stream failed"),
                }
            }
        }));
    }
    for product in feed.subscription.trades() {
        let mut trades = service.trades(product)?;
        consumers.push(tokio::spawn(async move {
            while let Some(item) = trades.next().await {
                match item {
                    Ok(trade) => info!(
                        instrument = %trade.instrument,
                        id = trade.id,
                        side = trade.side.as_str(),
                        price = %trade.price,
                        size = %trade.size,
                        notional = %notional(&trade),
                        own_fill = trade.own_fill,
                        "Trade"
                    ),
                    Err(e) => error!(error = %e, "Trade stream failed"),
                }
            }
        }));
    }

    subscribe_all(&mut write, &feed.subscription, feed.credentials.as_ref()).await?;

    tokio::select! {
        result = process_messages(&mut read, &hub) => {
            if let Err(e) = result {
                warn!(error = %e, "Feed connection ended with error");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
            hub.close_all();
        }
    }

    for consumer in consumers {
        let _ = consumer.await;
    }

    Ok(())
}
