use std::fmt;

use crate::event::TrackingEvent;
use crate::identity::Identity;

/// A tracking event ready to be written: identity attached, no further changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingItem {
    pub id: String,
    pub updated_at: String,
    pub user_agent: String,
    pub program_id: String,
    pub checksum: String,
    pub customer_id: i32,
    pub customer_name: String,
    pub message_id: String,
    pub program_name: String,
}

impl TrackingItem {
    pub fn new(identity: Identity, event: TrackingEvent) -> Self {
        Self {
            id: identity.id,
            updated_at: identity.updated_at,
            user_agent: event.user_agent,
            program_id: event.program_id,
            checksum: event.checksum,
            customer_id: event.customer_id,
            customer_name: event.customer_name,
            message_id: event.message_id,
            program_name: event.program_name,
        }
    }
}

impl fmt::Display for TrackingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {}, {}, {}, {}, {})",
            self.id,
            self.updated_at,
            self.program_id,
            self.checksum,
            self.customer_id,
            self.user_agent,
            self.program_name,
            self.customer_name,
            self.message_id
        )
    }
}
