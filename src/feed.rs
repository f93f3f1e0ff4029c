//! Per-channel raw frame delivery.
//!
//! [`ChannelSubscriber`] is the seam between the transport and the stream
//! pipelines: it hands out one receiver of raw frames per product channel.
//! [`ChannelHub`] is the in-process implementation the WebSocket reader
//! publishes into.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::models::message::RawFrame;

/// Supplies a raw frame stream for a named product channel.
pub trait ChannelSubscriber {
    /// Returns a new receiver for every frame published on `channel`
    /// from now on. The receiver ends when the channel is closed.
    fn subscribe_channel(&self, channel: &str) -> mpsc::UnboundedReceiver<RawFrame>;
}

type Senders = HashMap<String, Vec<mpsc::UnboundedSender<RawFrame>>>;

/// Fan-out of raw frames to every live receiver of a channel.
///
/// Cloning yields another handle to the same hub.
#[derive(Clone, Default)]
pub struct ChannelHub {
    senders: Arc<Mutex<Senders>>,
}

impl ChannelHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `frame` to every live receiver of `channel`, pruning
    /// receivers that have been dropped. Returns the number reached.
    pub fn publish(&self, channel: &str, frame: impl Into<RawFrame>) -> usize {
        let mut senders = self.lock();
        let Some(list) = senders.get_mut(channel) else {
            trace!(channel, "No subscribers for channel");
            return 0;
        };

        let frame = frame.into();
        list.retain(|tx| tx.send(frame.clone()).is_ok());
        let delivered = list.len();
        if list.is_empty() {
            senders.remove(channel);
        }

        delivered
    }

    /// Ends every stream on every channel.
    pub fn close_all(&self) {
        let mut senders = self.lock();
        debug!(channels = senders.len(), "Closing all channels");
        senders.clear();
    }

    /// Number of live receivers on `channel`.
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.lock()
            .get(channel)
            .map_or(0, |list| list.iter().filter(|tx| !tx.is_closed()).count())
    }

    fn lock(&self) -> MutexGuard<'_, Senders> {
        self.senders.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChannelSubscriber for ChannelHub {
    fn subscribe_channel(&self, channel: &str) -> mpsc::UnboundedReceiver<RawFrame> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().entry(channel.to_string()).or_default().push(tx);
        debug!(channel, "Subscribed to channel");
        rx
    }
}
