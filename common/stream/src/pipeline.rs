use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use async_trait::async_trait;
use aws_lambda_events::event::kinesis::KinesisEvent;
use metrics::{counter, histogram};
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::error::{BatchError, DecodeError, RecordError};
use crate::metrics_consts::{
    BATCH_DURATION, BATCH_FAILURES, DECODE_FAILURES, RECORDS_DELIVERED, RECORDS_RECEIVED,
    RECORDS_SKIPPED,
};
use crate::record::StreamRecord;

/// What the record loop does with a payload that fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeFailurePolicy {
    /// Log the failure and move on to the next record without writing anything.
    #[default]
    Skip,
    /// Log the failure and deliver an empty event in place of the record.
    UseDefault,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseDecodeFailurePolicyError(String);

impl fmt::Display for ParseDecodeFailurePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown decode failure policy {:?}, expected \"skip\" or \"default\"",
            self.0
        )
    }
}

impl std::error::Error for ParseDecodeFailurePolicyError {}

impl FromStr for DecodeFailurePolicy {
    type Err = ParseDecodeFailurePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(DecodeFailurePolicy::Skip),
            "default" | "use-default" => Ok(DecodeFailurePolicy::UseDefault),
            _ => Err(ParseDecodeFailurePolicyError(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Decode,
    Identity,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Decode => "decode",
            SkipReason::Identity => "identity",
        }
    }
}

/// Outcome of a record that did not abort the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    Skipped(SkipReason),
}

/// One pipeline variant: how to decode a payload and where the event goes.
#[async_trait]
pub trait RecordHandler: Send + Sync {
    type Event: Default + fmt::Debug + Send;

    /// Short label used in logs and metrics.
    fn name(&self) -> &'static str;

    fn decode(&self, payload: &[u8]) -> Result<Self::Event, DecodeError>;

    /// Write the event and run any follow-up side effect, in that order.
    async fn deliver(&self, event: Self::Event) -> Result<Delivery, RecordError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub received: usize,
    pub delivered: usize,
    pub skipped: usize,
}

/// Run every record of a batch through `handler`, in delivery order.
///
/// Decode failures are handled according to `policy` and never abort the batch.
/// The first write or notify failure stops the loop: later records are left
/// untouched and the error is returned so the runtime redelivers the batch.
pub async fn process_batch<H>(
    handler: &H,
    policy: DecodeFailurePolicy,
    records: Vec<StreamRecord>,
) -> Result<BatchSummary, BatchError>
where
    H: RecordHandler + ?Sized,
{
    let started = Instant::now();
    let pipeline = handler.name();
    let mut summary = BatchSummary {
        received: records.len(),
        ..Default::default()
    };
    counter!(RECORDS_RECEIVED, "pipeline" => pipeline).increment(records.len() as u64);

    for (position, record) in records.into_iter().enumerate() {
        let span = info_span!(
            "record",
            pipeline,
            position,
            sequence_number = %record.sequence_number
        );

        match process_record(handler, policy, &record).instrument(span).await {
            Ok(Delivery::Delivered) => {
                summary.delivered += 1;
                counter!(RECORDS_DELIVERED, "pipeline" => pipeline).increment(1);
            }
            Ok(Delivery::Skipped(reason)) => {
                summary.skipped += 1;
                counter!(RECORDS_SKIPPED, "pipeline" => pipeline, "reason" => reason.as_str())
                    .increment(1);
            }
            Err(source) => {
                counter!(BATCH_FAILURES, "pipeline" => pipeline, "cause" => source.kind())
                    .increment(1);
                histogram!(BATCH_DURATION, "pipeline" => pipeline)
                    .record(started.elapsed().as_secs_f64());
                error!(
                    pipeline,
                    position,
                    sequence_number = %record.sequence_number,
                    error = %source,
                    "aborting batch"
                );
                return Err(BatchError {
                    position,
                    sequence_number: record.sequence_number,
                    source,
                });
            }
        }
    }

    histogram!(BATCH_DURATION, "pipeline" => pipeline).record(started.elapsed().as_secs_f64());
    info!(
        pipeline,
        received = summary.received,
        delivered = summary.delivered,
        skipped = summary.skipped,
        "batch processed"
    );

    Ok(summary)
}

async fn process_record<H>(
    handler: &H,
    policy: DecodeFailurePolicy,
    record: &StreamRecord,
) -> Result<Delivery, RecordError>
where
    H: RecordHandler + ?Sized,
{
    let event = match handler.decode(&record.data) {
        Ok(event) => event,
        Err(e) => {
            counter!(DECODE_FAILURES, "pipeline" => handler.name()).increment(1);
            match policy {
                DecodeFailurePolicy::Skip => {
                    warn!(error = %e, "skipping record that failed to decode");
                    return Ok(Delivery::Skipped(SkipReason::Decode));
                }
                DecodeFailurePolicy::UseDefault => {
                    warn!(error = %e, "record failed to decode, continuing with an empty event");
                    H::Event::default()
                }
            }
        }
    };

    debug!(?event, "decoded record");
    handler.deliver(event).await
}

/// Entry point for a Kinesis-triggered invocation.
pub async fn handle_kinesis_event<H>(
    handler: &H,
    policy: DecodeFailurePolicy,
    event: KinesisEvent,
) -> Result<BatchSummary, BatchError>
where
    H: RecordHandler + ?Sized,
{
    process_batch(handler, policy, StreamRecord::from_kinesis_event(event)).await
}
