use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::query::builders::QueryFluentBuilder;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use common_stream::SinkError;
use tracing::{debug, instrument};

use super::DocumentStore;
use crate::item::TrackingItem;

const ID: &str = "id";
const UPDATED_AT: &str = "updated_at";
const USER_AGENT: &str = "user_agent";
const PROGRAM_ID: &str = "program_id";
const CHECKSUM: &str = "checksum";
const CUSTOMER_ID: &str = "customer_id";
const CUSTOMER_NAME: &str = "customer_name";
const MESSAGE_ID: &str = "message_id";
const PROGRAM_NAME: &str = "program_name";

/// DynamoDB store implementation.
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
}

impl DynamoDbStore {
    pub fn new(client: Client, table_name: String) -> DynamoDbStore {
        DynamoDbStore { client, table_name }
    }

    // Strongly consistent, so an item is visible to a read issued right after its put.
    fn query_by_id(&self, id: &str) -> QueryFluentBuilder {
        self.client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("#id = :id")
            .expression_attribute_names("#id", ID)
            .expression_attribute_values(":id", AttributeValue::S(id.to_owned()))
            .consistent_read(true)
            .limit(1)
    }
}

#[async_trait]
impl DocumentStore for DynamoDbStore {
    #[instrument(skip_all, fields(table = %self.table_name, id = %item.id))]
    async fn put(&self, item: &TrackingItem) -> Result<(), SinkError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_attributes(item)))
            .send()
            .await
            .map_err(|e| sink_error(&item.id, e))?;

        debug!("item stored");
        Ok(())
    }

    // The table may carry a sort key, so look the item up by partition key
    // instead of issuing a GetItem with a partial key.
    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn get(&self, id: &str) -> Result<Option<TrackingItem>, SinkError> {
        let output = self
            .query_by_id(id)
            .send()
            .await
            .map_err(|e| sink_error(id, e))?;

        output
            .items
            .unwrap_or_default()
            .first()
            .map(from_attributes)
            .transpose()
    }
}

fn sink_error<E>(key: &str, err: SdkError<E>) -> SinkError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    match err {
        SdkError::ServiceError(context) => {
            let err = context.into_err();
            match err.code() {
                Some(
                    "ProvisionedThroughputExceededException"
                    | "RequestLimitExceeded"
                    | "ThrottlingException",
                ) => SinkError::Throttled(err.to_string()),
                Some("InternalServerError" | "ServiceUnavailable") => {
                    SinkError::Unavailable(err.to_string())
                }
                _ => SinkError::Rejected {
                    key: key.to_owned(),
                    reason: DisplayErrorContext(&err).to_string(),
                },
            }
        }
        other => SinkError::Unavailable(DisplayErrorContext(&other).to_string()),
    }
}

/// Map an item to its DynamoDB attributes.
pub fn to_attributes(item: &TrackingItem) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (ID.to_owned(), AttributeValue::S(item.id.clone())),
        (UPDATED_AT.to_owned(), AttributeValue::S(item.updated_at.clone())),
        (USER_AGENT.to_owned(), AttributeValue::S(item.user_agent.clone())),
        (PROGRAM_ID.to_owned(), AttributeValue::S(item.program_id.clone())),
        (CHECKSUM.to_owned(), AttributeValue::S(item.checksum.clone())),
        (
            CUSTOMER_ID.to_owned(),
            AttributeValue::N(item.customer_id.to_string()),
        ),
        (
            CUSTOMER_NAME.to_owned(),
            AttributeValue::S(item.customer_name.clone()),
        ),
        (MESSAGE_ID.to_owned(), AttributeValue::S(item.message_id.clone())),
        (
            PROGRAM_NAME.to_owned(),
            AttributeValue::S(item.program_name.clone()),
        ),
    ])
}

/// Rebuild an item from the attributes written by [`to_attributes`].
pub fn from_attributes(
    attributes: &HashMap<String, AttributeValue>,
) -> Result<TrackingItem, SinkError> {
    let id = string_attribute(attributes, ID, "<unknown>")?;
    let customer_id = match attributes.get(CUSTOMER_ID) {
        Some(AttributeValue::N(value)) => value.parse::<i32>().map_err(|e| SinkError::Corrupt {
            key: id.clone(),
            reason: format!("{CUSTOMER_ID} is not a 32-bit integer: {e}"),
        })?,
        Some(_) => return Err(corrupt(&id, format!("{CUSTOMER_ID} is not a number"))),
        None => return Err(corrupt(&id, format!("{CUSTOMER_ID} is missing"))),
    };

    Ok(TrackingItem {
        updated_at: string_attribute(attributes, UPDATED_AT, &id)?,
        user_agent: string_attribute(attributes, USER_AGENT, &id)?,
        program_id: string_attribute(attributes, PROGRAM_ID, &id)?,
        checksum: string_attribute(attributes, CHECKSUM, &id)?,
        customer_id,
        customer_name: string_attribute(attributes, CUSTOMER_NAME, &id)?,
        message_id: string_attribute(attributes, MESSAGE_ID, &id)?,
        program_name: string_attribute(attributes, PROGRAM_NAME, &id)?,
        id,
    })
}

fn string_attribute(
    attributes: &HashMap<String, AttributeValue>,
    name: &str,
    key: &str,
) -> Result<String, SinkError> {
    match attributes.get(name) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(_) => Err(corrupt(key, format!("{name} is not a string"))),
        None => Err(corrupt(key, format!("{name} is missing"))),
    }
}

fn corrupt(key: &str, reason: String) -> SinkError {
    SinkError::Corrupt {
        key: key.to_owned(),
        reason,
    }
}
