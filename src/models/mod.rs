//! Shared models for the exchange WebSocket feed.
//!
//! Contains channel definitions, subscription request types, and the
//! decoded message and normalized output types.

pub mod book;
pub mod message;
pub mod product;
pub mod ticker;
pub mod trade;

use serde::{Deserialize, Serialize};

use crate::auth::SignedAuth;
use product::Product;

/// Order or trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Returns the other side.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

/// Available feed channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Level-2 snapshots and updates.
    Level2,
    /// Batched level-2 updates (public).
    Level2Batch,
    Ticker,
    /// Public trade executions (wire name: `"matches"`).
    Matches,
    /// Authenticated per-account messages, including own matches.
    User,
}

impl Channel {
    /// Returns the wire-format channel name expected by the venue.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Level2 => "level2",
            Channel::Level2Batch => "level2_batch",
            Channel::Ticker => "ticker",
            Channel::Matches => "matches",
            Channel::User => "user",
        }
    }
}

/// A channel name with the products it applies to.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelSpec {
    pub name: String,
    pub product_ids: Vec<String>,
}

impl ChannelSpec {
    pub fn new(channel: Channel, products: &[Product]) -> Self {
        Self {
            name: channel.as_str().to_string(),
            product_ids: products.iter().map(Product::channel_name).collect(),
        }
    }
}

/// A `subscribe` request sent to the feed.
#[derive(Debug, Serialize)]
pub struct SubscribeRequest {
    #[serde(rename = "type")]
    pub tpe: String,
    pub channels: Vec<ChannelSpec>,
    #[serde(flatten)]
    pub auth: Option<SignedAuth>,
}

impl SubscribeRequest {
    pub fn new(channels: Vec<ChannelSpec>, auth: Option<SignedAuth>) -> Self {
        Self {
            tpe: "subscribe".to_string(),
            channels,
            auth,
        }
    }
}

/// An `unsubscribe` request sent to the feed.
#[derive(Debug, Serialize)]
pub struct UnsubscribeRequest {
    #[serde(rename = "type")]
    pub tpe: String,
    pub channels: Vec<ChannelSpec>,
}

impl UnsubscribeRequest {
    pub fn new(channels: Vec<ChannelSpec>) -> Self {
        Self {
            tpe: "unsubscribe".to_string(),
            channels,
        }
    }
}

/// Subscription acknowledgement listing the active channels.
#[derive(Debug, Deserialize)]
pub struct SubscriptionsResponse {
    pub channels: Vec<SubscribedChannel>,
}

/// One entry of a [`SubscriptionsResponse`].
#[derive(Debug, Deserialize)]
pub struct SubscribedChannel {
    pub name: String,
    #[serde(default)]
    pub product_ids: Vec<String>,
}

/// Error frame sent by the venue (bad request, auth failure).
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default)]
    pub reason: Option<String>,
}
