use async_trait::async_trait;
use common_stream::SinkError;

use crate::item::TrackingItem;

mod dynamodb;
mod mock;

pub use dynamodb::{from_attributes, to_attributes, DynamoDbStore};
pub use mock::{MockDocumentStore, MockStoreCall};

/// Keyed document store holding one item per written event.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Unconditionally create or replace the item stored under `item.id`.
    async fn put(&self, item: &TrackingItem) -> Result<(), SinkError>;

    /// Look an item up by its identifier.
    async fn get(&self, id: &str) -> Result<Option<TrackingItem>, SinkError>;
}
