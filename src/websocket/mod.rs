//! Async WebSocket client for the exchange feed.
//!
//! This module is organized by domain:
//! - [`subscription`] - Channel subscribe/unsubscribe operations
//! - [`handler`] - Incoming frame routing into a [`ChannelHub`](crate::feed::ChannelHub)

mod handler;
mod subscription;

use futures_util::StreamExt;
use futures_util::stream::{SplitSink, SplitStream};
use tokio::net::TcpStream;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::info;
use tungstenite::Message;

use crate::Result;

// Re-export submodule functions at the module level for convenience
pub use handler::{process_messages, route_frame};
pub use subscription::{channel_specs, subscribe, subscribe_all, unsubscribe};

/// Write half of a feed connection.
pub type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Read half of a feed connection.
pub type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Establishes a WebSocket connection to the given URL.
///
/// # Errors
///
/// Returns a [`CambistError`](crate::CambistError) if the connection or TLS handshake fails.
pub async fn connect(url: &str) -> Result<(WsWriter, WsReader)> {
    let (ws_stream, _) = connect_async(url).await?;
    info!(url, "WebSocket handshake completed");

    Ok(ws_stream.split())
}
