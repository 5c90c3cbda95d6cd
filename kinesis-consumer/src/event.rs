use crate::proto::TrackingMessage;

/// A decoded tracking event, named the way it is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingEvent {
    pub user_agent: String,
    pub program_id: String,
    pub checksum: String,
    pub customer_id: i32,
    pub customer_name: String,
    pub message_id: String,
    pub program_name: String,
}

impl From<TrackingMessage> for TrackingEvent {
    // `is_valid` is not part of the stored item.
    fn from(message: TrackingMessage) -> Self {
        Self {
            user_agent: message.user_agent,
            program_id: message.programid,
            checksum: message.checksum,
            customer_id: message.customer_id,
            customer_name: message.customer_name,
            message_id: message.message_id,
            program_name: message.program_name,
        }
    }
}
