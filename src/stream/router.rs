//! Capability checks and per-message routing.

use tracing::debug;

use crate::Result;
use crate::error::CambistError;
use crate::models::message::StreamMessage;
use crate::models::product::Product;
use crate::subscription::{Category, ProductSubscription};

/// A verified (product, category) pair.
///
/// Only obtainable through [`route`], so holding one proves the product
/// was declared for the category.
#[derive(Debug, Clone)]
pub struct Route {
    product: Product,
    category: Category,
    channel: String,
}

/// Verifies that `product` was declared for `category`.
///
/// Runs once, before any message is consumed.
///
/// # Errors
///
/// Returns [`CambistError::NotSubscribed`] if the product is not in the
/// subscription for that category.
pub fn route(
    subscription: &ProductSubscription,
    product: &Product,
    category: Category,
) -> Result<Route> {
    if !subscription.contains(category, product) {
        return Err(CambistError::NotSubscribed {
            product: product.clone(),
            category,
        });
    }

    debug!(product = %product, category = %category, "Route verified");
    Ok(Route {
        product: product.clone(),
        category,
        channel: product.channel_name(),
    })
}

impl Route {
    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Venue channel name (`"BTC-USD"`) the route reads from.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Returns `true` if `message` belongs on this route: its tag is in the
    /// category's set and its product id is this route's product.
    pub fn accepts(&self, message: &StreamMessage) -> bool {
        message.kind().is_some_and(|kind| self.category.accepts(kind))
            && message.product_id() == Some(self.channel.as_str())
    }
}
