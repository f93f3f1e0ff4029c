//! Declared product subscriptions, per market data category.

use std::fmt;

use crate::models::message::MessageKind;
use crate::models::product::Product;

/// The three independent output streams a product can be requested on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    OrderBook,
    Ticker,
    Trades,
}

impl Category {
    /// Returns `true` if messages of `kind` feed this category's stream.
    pub fn accepts(self, kind: MessageKind) -> bool {
        matches!(
            (self, kind),
            (Category::OrderBook, MessageKind::Snapshot)
                | (Category::OrderBook, MessageKind::Delta)
                | (Category::Ticker, MessageKind::TickerTick)
                | (Category::Trades, MessageKind::Execution)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::OrderBook => "orderbook",
            Category::Ticker => "ticker",
            Category::Trades => "trades",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Products declared for each category at connect time.
///
/// Streams can only be requested for products listed here; anything else
/// is rejected with [`CambistError::NotSubscribed`](crate::CambistError::NotSubscribed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductSubscription {
    order_book: Vec<Product>,
    ticker: Vec<Product>,
    trades: Vec<Product>,
}

impl ProductSubscription {
    /// Starts an empty subscription builder.
    pub fn builder() -> ProductSubscriptionBuilder {
        ProductSubscriptionBuilder::default()
    }

    pub fn order_book(&self) -> &[Product] {
        &self.order_book
    }

    pub fn ticker(&self) -> &[Product] {
        &self.ticker
    }

    pub fn trades(&self) -> &[Product] {
        &self.trades
    }

    /// Returns the products declared for `category`.
    pub fn products(&self, category: Category) -> &[Product] {
        match category {
            Category::OrderBook => &self.order_book,
            Category::Ticker => &self.ticker,
            Category::Trades => &self.trades,
        }
    }

    /// Returns `true` if `product` was declared for `category`.
    pub fn contains(&self, category: Category, product: &Product) -> bool {
        self.products(category).contains(product)
    }

    /// Every distinct product across all categories, in declaration order.
    pub fn all_products(&self) -> Vec<Product> {
        let mut all: Vec<Product> = Vec::new();
        for product in self.order_book.iter().chain(&self.ticker).chain(&self.trades) {
            if !all.contains(product) {
                all.push(product.clone());
            }
        }
        all
    }

    pub fn is_empty(&self) -> bool {
        self.order_book.is_empty() && self.ticker.is_empty() && self.trades.is_empty()
    }
}

/// Builder for [`ProductSubscription`]. Duplicate additions are ignored.
#[derive(Debug, Default)]
pub struct ProductSubscriptionBuilder {
    inner: ProductSubscription,
}

impl ProductSubscriptionBuilder {
    /// Declares `product` for every category.
    pub fn add_all(self, product: Product) -> Self {
        self.add_order_book(product.clone())
            .add_ticker(product.clone())
            .add_trades(product)
    }

    pub fn add_order_book(mut self, product: Product) -> Self {
        push_unique(&mut self.inner.order_book, product);
        self
    }

    pub fn add_ticker(mut self, product: Product) -> Self {
        push_unique(&mut self.inner.ticker, product);
        self
    }

    pub fn add_trades(mut self, product: Product) -> Self {
        push_unique(&mut self.inner.trades, product);
        self
    }

    pub fn build(self) -> ProductSubscription {
        self.inner
    }
}

fn push_unique(products: &mut Vec<Product>, product: Product) {
    if !products.contains(&product) {
        products.push(product);
    }
}
