//! Shared plumbing for the stream-triggered delivery pipelines.
//!
//! A pipeline is a [`pipeline::RecordHandler`] that knows how to decode one
//! record payload and deliver the resulting event to its sink. The record loop
//! in [`pipeline::process_batch`] drives a handler over one stream batch,
//! strictly in order, and stops at the first write or notify failure so the
//! invoking runtime can redeliver the batch.

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics_consts;
pub mod pipeline;
pub mod record;

pub use error::{
    BatchError, DecodeError, IdentityError, NotifyError, RecordError, SinkError,
};
pub use pipeline::{
    handle_kinesis_event, process_batch, BatchSummary, DecodeFailurePolicy, Delivery,
    RecordHandler, SkipReason,
};
pub use record::StreamRecord;
