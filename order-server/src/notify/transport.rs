//! Pluggable delivery transport for notification fan-out
//!
//! The workflow is agnostic to how updates reach clients; a transport maps
//! channel names to whatever delivery mechanism it owns. The in-process
//! implementation here backs each channel with a tokio broadcast sender.

use async_trait::async_trait;
use dashmap::DashMap;
use shared::order::OrderEvent;
use tokio::sync::broadcast;

/// Per-channel broadcast capacity
const CHANNEL_CAPACITY: usize = 256;

/// Transport errors
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("no subscribers on channel {0}")]
    NoSubscribers(String),

    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Delivery transport abstraction
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver one event to one channel.
    async fn deliver(&self, channel: &str, event: &OrderEvent) -> Result<(), TransportError>;
}

/// In-process transport backed by per-channel broadcast senders
#[derive(Debug, Default)]
pub struct MemoryTransport {
    channels: DashMap<String, broadcast::Sender<OrderEvent>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a channel, creating it on first use.
    pub fn subscribe(&self, channel: &str) -> broadcast::Receiver<OrderEvent> {
        self.channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn deliver(&self, channel: &str, event: &OrderEvent) -> Result<(), TransportError> {
        match self.channels.get(channel) {
            Some(tx) => tx
                .send(event.clone())
                .map(|_| ())
                .map_err(|_| TransportError::NoSubscribers(channel.to_string())),
            None => Err(TransportError::NoSubscribers(channel.to_string())),
        }
    }
}
