use std::sync::Arc;

use async_trait::async_trait;
use common_stream::NotifyError;
use serde::Serialize;
use tracing::info;

mod memory;
mod redis_pubsub;

pub use memory::MemoryBroadcast;
pub use redis_pubsub::RedisPublisher;

/// Fire-and-forget broadcast of a payload to whoever is subscribed right now.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Returns the number of subscribers that received the payload.
    async fn publish(&self, channel: &str, payload: String) -> Result<usize, NotifyError>;
}

/// Announces stored events as JSON on a single channel.
#[derive(Clone)]
pub struct Notifier {
    publisher: Arc<dyn Publisher>,
    channel: String,
}

impl Notifier {
    pub fn new(publisher: Arc<dyn Publisher>, channel: impl Into<String>) -> Self {
        Self {
            publisher,
            channel: channel.into(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub async fn notify<T: Serialize + Sync>(&self, event: &T) -> Result<usize, NotifyError> {
        let payload =
            serde_json::to_string(event).map_err(|e| NotifyError::Serialization(e.to_string()))?;

        let receivers = self.publisher.publish(&self.channel, payload).await?;
        info!(channel = %self.channel, receivers, "published notification");

        Ok(receivers)
    }
}
