pub const RECORDS_RECEIVED: &str = "stream_pipeline_records_received";
pub const RECORDS_DELIVERED: &str = "stream_pipeline_records_delivered";
pub const RECORDS_SKIPPED: &str = "stream_pipeline_records_skipped";
pub const DECODE_FAILURES: &str = "stream_pipeline_decode_failures";
pub const BATCH_FAILURES: &str = "stream_pipeline_batch_failures";
pub const BATCH_DURATION: &str = "stream_pipeline_batch_duration_seconds";
