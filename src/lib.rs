//! Exchange WebSocket market data demultiplexer.
//!
//! Turns one interleaved feed of decoded exchange messages (book
//! snapshots, level-2 deltas, ticker ticks, and trade matches) into three
//! independent, strongly-typed streams per product: a continuously
//! maintained order book, a synthesized ticker, and individual trades.

pub mod adapters;
pub mod auth;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod stream;
pub mod subscription;
pub mod websocket;

pub use error::{CambistError, Result};
