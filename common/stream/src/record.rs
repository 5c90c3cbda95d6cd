use aws_lambda_events::event::kinesis::{KinesisEvent, KinesisEventRecord};

/// One record of a stream batch, stripped of transport details.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamRecord {
    pub sequence_number: String,
    pub partition_key: String,
    pub data: Vec<u8>,
}

impl StreamRecord {
    pub fn new(sequence_number: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            sequence_number: sequence_number.into(),
            partition_key: String::new(),
            data: data.into(),
        }
    }

    pub fn with_partition_key(mut self, partition_key: impl Into<String>) -> Self {
        self.partition_key = partition_key.into();
        self
    }

    /// Unpack a Kinesis-triggered invocation, keeping delivery order.
    pub fn from_kinesis_event(event: KinesisEvent) -> Vec<StreamRecord> {
        event.records.into_iter().map(StreamRecord::from).collect()
    }
}

impl From<KinesisEventRecord> for StreamRecord {
    fn from(record: KinesisEventRecord) -> Self {
        let kinesis = record.kinesis;
        Self {
            sequence_number: kinesis.sequence_number,
            partition_key: kinesis.partition_key,
            data: kinesis.data.0,
        }
    }
}
