//! Incoming WebSocket frame routing.

use futures_util::StreamExt;
use tracing::{debug, info, trace, warn};
use tungstenite::Message;

use super::WsReader;
use crate::Result;
use crate::feed::ChannelHub;
use crate::models::{ErrorResponse, SubscriptionsResponse};

/// Reads frames until the connection closes, publishing each product
/// frame to its channel on `hub`.
///
/// The hub is closed on return, success or not, so every stream fed by
/// this connection ends. Resubscribing after a reconnect therefore always
/// starts from fresh stream state.
///
/// # Errors
///
/// Returns a [`CambistError`](crate::CambistError) if reading from the
/// WebSocket fails.
pub async fn process_messages(read: &mut WsReader, hub: &ChannelHub) -> Result<()> {
    let result = read_frames(read, hub).await;
    hub.close_all();
    info!("WebSocket reader stopped");

    result
}

async fn read_frames(read: &mut WsReader, hub: &ChannelHub) -> Result<()> {
    while let Some(msg) = read.next().await {
        match msg? {
            Message::Text(text) => route_frame(text.as_str(), hub),
            Message::Close(frame) => {
                info!(?frame, "WebSocket closed by server");
                break;
            }
            _ => {}
        }
    }

    Ok(())
}

/// Routes one text frame.
///
/// Frames carrying a `product_id` go to that product's channel untouched;
/// decoding into stream messages happens per stream. Subscription acks,
/// heartbeats, and venue error frames are logged. A frame that is not JSON
/// names no product, so it is logged and skipped without touching any
/// stream.
pub fn route_frame(text: &str, hub: &ChannelHub) {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Skipping non-JSON frame");
            return;
        }
    };

    // Owned so `value` can be consumed by the typed parses below
    let msg_type = value
        .get("type")
        .and_then(|t| t.as_str())
        .map(String::from);

    match msg_type.as_deref() {
        Some("subscriptions") => {
            match serde_json::from_value::<SubscriptionsResponse>(value) {
                Ok(response) => {
                    for channel in &response.channels {
                        info!(
                            channel = channel.name,
                            products = ?channel.product_ids,
                            "Subscription active"
                        );
                    }
                }
                Err(e) => warn!(error = %e, "Unreadable subscriptions frame"),
            }
            return;
        }
        Some("error") => {
            match serde_json::from_value::<ErrorResponse>(value) {
                Ok(response) => warn!(
                    message = response.message,
                    reason = ?response.reason,
                    "Venue error"
                ),
                Err(e) => warn!(error = %e, "Unreadable venue error frame"),
            }
            return;
        }
        Some("heartbeat") => {
            debug!("Received heartbeat");
        }
        _ => {}
    }

    match value.get("product_id").and_then(|p| p.as_str()) {
        Some(product_id) => {
            let delivered = hub.publish(product_id, text);
            trace!(product_id, msg_type = msg_type.as_deref(), delivered, "Routed frame");
        }
        None => {
            debug!(msg_type = msg_type.as_deref(), "Skipping frame without product");
        }
    }
}
