use std::sync::Arc;

use async_trait::async_trait;
use common_stream::{
    DecodeError, Delivery, IdentityError, RecordError, RecordHandler, SinkError, SkipReason,
};
use thiserror::Error;
use tracing::{error, info};

use crate::decode::decode_tracking_event;
use crate::event::TrackingEvent;
use crate::identity::IdentityAssigner;
use crate::item::TrackingItem;
use crate::store::DocumentStore;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Write(#[from] SinkError),
}

/// Decode, stamp and store tracking events in a document store.
pub struct TrackingPipeline {
    store: Arc<dyn DocumentStore>,
    identities: IdentityAssigner,
}

impl TrackingPipeline {
    pub fn new(store: Arc<dyn DocumentStore>, identities: IdentityAssigner) -> Self {
        Self { store, identities }
    }

    /// Attach a fresh identity to `event` and write it, returning what was stored.
    pub async fn persist(&self, event: TrackingEvent) -> Result<TrackingItem, PersistError> {
        let identity = self.identities.assign(&event.message_id)?;
        let item = TrackingItem::new(identity, event);

        info!(
            id = %item.id,
            program_id = %item.program_id,
            customer_id = item.customer_id,
            message_id = %item.message_id,
            "putting item into document store"
        );
        self.store.put(&item).await?;

        Ok(item)
    }
}

#[async_trait]
impl RecordHandler for TrackingPipeline {
    type Event = TrackingEvent;

    fn name(&self) -> &'static str {
        "kinesis-consumer"
    }

    fn decode(&self, payload: &[u8]) -> Result<TrackingEvent, DecodeError> {
        decode_tracking_event(payload)
    }

    async fn deliver(&self, event: TrackingEvent) -> Result<Delivery, RecordError> {
        match self.persist(event).await {
            Ok(_) => Ok(Delivery::Delivered),
            Err(PersistError::Identity(e)) => {
                error!(error = %e, "skipping record, no identifier could be generated");
                Ok(Delivery::Skipped(SkipReason::Identity))
            }
            Err(PersistError::Write(e)) => {
                error!(error = %e, retryable = e.is_retryable(), "failed to put item");
                Err(RecordError::Write(e))
            }
        }
    }
}
