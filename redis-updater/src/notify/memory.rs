use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use common_stream::NotifyError;
use tokio::sync::broadcast;

use super::Publisher;

const CHANNEL_CAPACITY: usize = 64;

/// In-process pub/sub with the same delivery rules as Redis: only receivers
/// subscribed at publish time get the message, and nothing is replayed.
#[derive(Default)]
pub struct MemoryBroadcast {
    channels: Mutex<HashMap<String, broadcast::Sender<String>>>,
    failure: Option<String>,
}

impl MemoryBroadcast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every publish fail with `reason`.
    pub fn with_failure(mut self, reason: &str) -> Self {
        self.failure = Some(reason.to_owned());
        self
    }

    pub fn subscribe(&self, channel: &str) -> broadcast::Receiver<String> {
        self.sender(channel).subscribe()
    }

    fn lock_channels(&self) -> MutexGuard<'_, HashMap<String, broadcast::Sender<String>>> {
        match self.channels.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn sender(&self, channel: &str) -> broadcast::Sender<String> {
        self.lock_channels()
            .entry(channel.to_owned())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }
}

#[async_trait]
impl Publisher for MemoryBroadcast {
    async fn publish(&self, channel: &str, payload: String) -> Result<usize, NotifyError> {
        if let Some(reason) = &self.failure {
            return Err(NotifyError::Publish {
                channel: channel.to_owned(),
                reason: reason.clone(),
            });
        }

        // A send error only means nobody is listening.
        Ok(self.sender(channel).send(payload).unwrap_or(0))
    }
}
