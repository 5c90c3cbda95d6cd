//! Producer-side wire schema.
//!
//! ```protobuf
//! syntax = "proto3";
//!
//! message TrackingEvent {
//!   string programid = 1;
//!   string checksum = 2;
//!   int32 customerId = 3;
//!   string userAgent = 4;
//!   string programName = 5;
//!   string customerName = 6;
//!   bool isValid = 7;
//!   string messageId = 8;
//! }
//! ```

/// A tracking event exactly as the producer encodes it.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TrackingMessage {
    #[prost(string, tag = "1")]
    pub programid: String,
    #[prost(string, tag = "2")]
    pub checksum: String,
    #[prost(int32, tag = "3")]
    pub customer_id: i32,
    #[prost(string, tag = "4")]
    pub user_agent: String,
    #[prost(string, tag = "5")]
    pub program_name: String,
    #[prost(string, tag = "6")]
    pub customer_name: String,
    #[prost(bool, tag = "7")]
    pub is_valid: bool,
    #[prost(string, tag = "8")]
    pub message_id: String,
}
