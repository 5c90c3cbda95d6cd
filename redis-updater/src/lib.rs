//! Mirror JSON tracking events from a Kinesis stream into Redis hashes and
//! announce every update on a pub/sub channel.

pub mod config;
pub mod decode;
pub mod event;
pub mod handler;
pub mod notify;
pub mod store;
