use common_stream::DecodeError;
use prost::Message;

use crate::event::TrackingEvent;
use crate::proto::TrackingMessage;

/// Decode a protobuf record payload into a [`TrackingEvent`].
///
/// An empty payload is rejected: protobuf would happily decode it into an
/// all-default message, which is never a real event.
pub fn decode_tracking_event(payload: &[u8]) -> Result<TrackingEvent, DecodeError> {
    if payload.is_empty() {
        return Err(DecodeError::EmptyPayload);
    }

    let message = TrackingMessage::decode(payload)?;
    Ok(TrackingEvent::from(message))
}
