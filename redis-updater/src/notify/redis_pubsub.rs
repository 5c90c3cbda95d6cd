use async_trait::async_trait;
use common_stream::NotifyError;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::Publisher;

/// Publishes through Redis `PUBLISH`.
#[derive(Clone)]
pub struct RedisPublisher {
    connection: ConnectionManager,
}

impl RedisPublisher {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl Publisher for RedisPublisher {
    async fn publish(&self, channel: &str, payload: String) -> Result<usize, NotifyError> {
        let mut conn = self.connection.clone();

        let receivers: i64 = conn
            .publish(channel, payload)
            .await
            .map_err(|err| NotifyError::Publish {
                channel: channel.to_owned(),
                reason: err.to_string(),
            })?;

        Ok(usize::try_from(receivers).unwrap_or_default())
    }
}
