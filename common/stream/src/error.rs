use thiserror::Error;

/// A record payload could not be turned into an event.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("record payload is empty")]
    EmptyPayload,
    #[error("record payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("malformed protobuf payload: {0}")]
    Protobuf(#[from] prost::DecodeError),
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("required field {0} is missing or empty")]
    MissingField(&'static str),
}

/// The random source backing identifier generation failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to generate record identifier: {0}")]
pub struct IdentityError(pub String);

/// Enumeration of errors returned by a sink client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("sink throttled the request: {0}")]
    Throttled(String),
    #[error("sink rejected the operation on {key}: {reason}")]
    Rejected { key: String, reason: String },
    #[error("sink unavailable: {0}")]
    Unavailable(String),
    #[error("stored value for {key} could not be parsed: {reason}")]
    Corrupt { key: String, reason: String },
}

impl SinkError {
    /// Whether a redelivery of the same write has a chance of succeeding.
    ///
    /// Nothing in the pipeline retries on its own; this only feeds logs and metrics.
    pub fn is_retryable(&self) -> bool {
        match self {
            SinkError::Throttled(_) | SinkError::Unavailable(_) => true,
            SinkError::Rejected { .. } | SinkError::Corrupt { .. } => false,
        }
    }
}

/// Enumeration of errors raised while notifying subscribers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("failed to serialize notification: {0}")]
    Serialization(String),
    #[error("failed to publish to channel {channel}: {reason}")]
    Publish { channel: String, reason: String },
}

/// Errors that abort the whole batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("write failed: {0}")]
    Write(#[from] SinkError),
    #[error("notify failed: {0}")]
    Notify(#[from] NotifyError),
}

impl RecordError {
    pub fn kind(&self) -> &'static str {
        match self {
            RecordError::Write(_) => "write",
            RecordError::Notify(_) => "notify",
        }
    }
}

/// Failure of one invocation, pointing at the record that stopped it.
///
/// Records before `position` have already been committed to the sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("batch aborted at record {position} (sequence number {sequence_number}): {source}")]
pub struct BatchError {
    pub position: usize,
    pub sequence_number: String,
    #[source]
    pub source: RecordError,
}
