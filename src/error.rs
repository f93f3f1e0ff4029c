//! Crate-level error types.
//!
//! [`CambistError`] unifies every error source (configuration, capability
//! checks, decoding, adapter contracts, WebSocket, JSON) behind a single
//! enum so callers can match on the variant they care about while still
//! using the `?` operator for easy propagation.

use crate::models::product::Product;
use crate::subscription::Category;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CambistError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum CambistError {
    /// Environment configuration is missing, partial, or unparsable.
    #[error("configuration error: {0}")]
    Config(String),

    /// The product was never declared for the requested category.
    ///
    /// Raised synchronously when a stream is requested; no stream is
    /// produced and no message is consumed.
    #[error("the product {product} is not subscribed for {category}")]
    NotSubscribed { product: Product, category: Category },

    /// A frame could not be decoded into a stream message.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// A trade adapter yielded nothing for a single execution.
    #[error("trade adapter produced no trade for execution {trade_id}")]
    EmptyAdaptation { trade_id: u64 },

    /// Request signing failed (bad secret encoding, bad key length).
    #[error("authentication error: {0}")]
    Auth(String),

    /// A WebSocket operation (connect, send, receive) failed.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
