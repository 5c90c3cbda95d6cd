use std::collections::HashMap;

use async_trait::async_trait;
use common_stream::SinkError;

mod mock;
mod redis_hash;

pub use mock::{MockFieldMapStore, MockStoreCall};
pub use redis_hash::RedisFieldMapStore;

/// A store of flat string field maps, one per key.
#[async_trait]
pub trait FieldMapStore: Send + Sync {
    /// Replace whatever is stored under `key` with exactly `fields`.
    ///
    /// Readers never observe a mix of the previous and the new fields.
    async fn replace(&self, key: &str, fields: &[(&'static str, String)]) -> Result<(), SinkError>;

    /// Read the field map under `key`. An unknown key reads as an empty map.
    async fn read(&self, key: &str) -> Result<HashMap<String, String>, SinkError>;
}
