//! Trade models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::Side;
use super::product::Product;

/// A single executed trade, either public or one of our own fills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trade {
    /// Venue trade id, as a string.
    pub id: String,
    pub instrument: Product,
    pub price: Decimal,
    pub size: Decimal,
    pub side: Side,
    pub timestamp: DateTime<Utc>,
    /// `true` for a fill on our own account, `false` for a public trade.
    pub own_fill: bool,
    /// Our order id; set on own fills only.
    pub order_id: Option<String>,
}
