//! Persist binary tracking events from a Kinesis stream into a DynamoDB table.
//!
//! Each record is decoded from the producer's protobuf schema, stamped with a
//! fresh identifier and write timestamp, and written with a single `PutItem`.

pub mod config;
pub mod decode;
pub mod event;
pub mod handler;
pub mod identity;
pub mod item;
pub mod proto;
pub mod store;
