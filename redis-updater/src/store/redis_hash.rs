use std::collections::HashMap;

use async_trait::async_trait;
use common_stream::SinkError;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError, RetryMethod};
use tracing::instrument;

use super::FieldMapStore;

/// Field maps kept as Redis hashes, keyed by program id.
#[derive(Clone)]
pub struct RedisFieldMapStore {
    connection: ConnectionManager,
}

impl RedisFieldMapStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl FieldMapStore for RedisFieldMapStore {
    #[instrument(skip_all, fields(key = key))]
    async fn replace(&self, key: &str, fields: &[(&'static str, String)]) -> Result<(), SinkError> {
        let mut conn = self.connection.clone();

        // MULTI/EXEC so no reader sees the hash between DEL and HSET.
        redis::pipe()
            .atomic()
            .del(key)
            .ignore()
            .hset_multiple(key, fields)
            .ignore()
            .query_async::<()>(&mut conn)
            .await
            .map_err(|err| sink_error(key, err))
    }

    #[instrument(skip_all, fields(key = key))]
    async fn read(&self, key: &str) -> Result<HashMap<String, String>, SinkError> {
        let mut conn = self.connection.clone();

        conn.hgetall(key).await.map_err(|err| sink_error(key, err))
    }
}

fn sink_error(key: &str, err: RedisError) -> SinkError {
    if err.is_timeout() {
        return SinkError::Unavailable(err.to_string());
    }

    match err.retry_method() {
        RetryMethod::WaitAndRetry => SinkError::Throttled(err.to_string()),
        RetryMethod::NoRetry => SinkError::Rejected {
            key: key.to_owned(),
            reason: err.to_string(),
        },
        _ => SinkError::Unavailable(err.to_string()),
    }
}
