use std::sync::Arc;

use async_trait::async_trait;
use common_stream::{DecodeError, Delivery, RecordError, RecordHandler};
use tracing::{error, info};

use crate::decode::decode_tracking_message;
use crate::event::TrackingMessage;
use crate::notify::Notifier;
use crate::store::FieldMapStore;

/// Store each tracking message under its program id, then announce it.
pub struct RedisPipeline {
    store: Arc<dyn FieldMapStore>,
    notifier: Notifier,
}

impl RedisPipeline {
    pub fn new(store: Arc<dyn FieldMapStore>, notifier: Notifier) -> Self {
        Self { store, notifier }
    }
}

#[async_trait]
impl RecordHandler for RedisPipeline {
    type Event = TrackingMessage;

    fn name(&self) -> &'static str {
        "redis-updater"
    }

    fn decode(&self, payload: &[u8]) -> Result<TrackingMessage, DecodeError> {
        decode_tracking_message(payload)
    }

    async fn deliver(&self, event: TrackingMessage) -> Result<Delivery, RecordError> {
        info!(
            program_id = %event.program_id,
            customer_id = event.customer_id,
            "replacing field map"
        );

        if let Err(e) = self
            .store
            .replace(&event.program_id, &event.field_map())
            .await
        {
            error!(error = %e, retryable = e.is_retryable(), "failed to write field map");
            return Err(RecordError::Write(e));
        }

        // The write stays in place even if nobody hears about it.
        if let Err(e) = self.notifier.notify(&event).await {
            error!(error = %e, channel = self.notifier.channel(), "failed to publish update");
            return Err(RecordError::Notify(e));
        }

        Ok(Delivery::Delivered)
    }
}
