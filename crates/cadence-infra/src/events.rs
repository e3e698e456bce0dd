//! In-memory event bus.
//!
//! Post events are routed by [`PostEvent::channel`] and carried as JSON so a
//! subscriber sees exactly what an out-of-process consumer would.
//! Works within a single process only.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};

use cadence_core::ports::{EventError, PostEvent, PostEventSink};

/// Broadcast-based pub/sub for post events.
pub struct InMemoryEventBus {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<String>>>>,
    buffer_size: usize,
}

impl InMemoryEventBus {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Run `handler` for every event published on `channel` from now on.
    pub async fn subscribe<F>(&self, channel: &str, handler: F)
    where
        F: Fn(PostEvent) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync + 'static,
    {
        let mut channels = self.channels.write().await;
        let sender = channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.buffer_size).0);

        let mut receiver = sender.subscribe();
        let channel_name = channel.to_string();
        let handler = Arc::new(handler);

        tokio::spawn(async move {
            tracing::info!(channel = %channel_name, "Subscribed to channel");

            loop {
                match receiver.recv().await {
                    Ok(payload) => match serde_json::from_str::<PostEvent>(&payload) {
                        Ok(event) => handler(event).await,
                        Err(e) => {
                            tracing::warn!(channel = %channel_name, error = %e, "Dropping malformed event");
                        }
                    },
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        tracing::warn!(
                            channel = %channel_name,
                            lagged = count,
                            "Subscriber lagged behind"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!(channel = %channel_name, "Channel closed");
                        break;
                    }
                }
            }
        });
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl PostEventSink for InMemoryEventBus {
    async fn publish(&self, event: PostEvent) -> Result<(), EventError> {
        let payload =
            serde_json::to_string(&event).map_err(|e| EventError::Serialization(e.to_string()))?;
        let channel = event.channel();
        let channels = self.channels.read().await;

        match channels.get(channel) {
            Some(sender) => {
                // Sending only fails when every receiver is gone.
                let _ = sender.send(payload);
                tracing::debug!(channel = %channel, post_id = %event.post_id(), "Event published");
            }
            None => {
                tracing::debug!(channel = %channel, "No subscribers for channel");
            }
        }
        Ok(())
    }
}
