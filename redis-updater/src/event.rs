use std::collections::HashMap;

use common_stream::SinkError;
use serde::{Deserialize, Serialize};

const PROGRAM_ID: &str = "programId";
const CHECKSUM: &str = "checksum";
const CUSTOMER_ID: &str = "customerId";
const CUSTOMER_NAME: &str = "customerName";
const PROGRAM_NAME: &str = "programName";
const VALID: &str = "valid";

/// A tracking event as published by the tracking service. Missing keys take
/// their default value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackingMessage {
    pub program_id: String,
    pub checksum: String,
    pub customer_id: i32,
    pub customer_name: String,
    pub program_name: String,
    #[serde(rename = "valid")]
    pub is_valid: bool,
}

impl TrackingMessage {
    /// Flat field map stored under the program id, keyed like the JSON encoding.
    pub fn field_map(&self) -> Vec<(&'static str, String)> {
        vec![
            (PROGRAM_ID, self.program_id.clone()),
            (CHECKSUM, self.checksum.clone()),
            (CUSTOMER_ID, self.customer_id.to_string()),
            (CUSTOMER_NAME, self.customer_name.clone()),
            (PROGRAM_NAME, self.program_name.clone()),
            (VALID, self.is_valid.to_string()),
        ]
    }

    /// Parse a field map written by [`TrackingMessage::field_map`].
    pub fn from_field_map(key: &str, fields: &HashMap<String, String>) -> Result<Self, SinkError> {
        let field = |name: &str| {
            fields.get(name).cloned().ok_or_else(|| SinkError::Corrupt {
                key: key.to_owned(),
                reason: format!("{name} is missing"),
            })
        };
        let corrupt = |name: &str, value: &str| SinkError::Corrupt {
            key: key.to_owned(),
            reason: format!("{name} has unexpected value {value:?}"),
        };

        let customer_id = field(CUSTOMER_ID)?;
        let valid = field(VALID)?;

        Ok(Self {
            program_id: field(PROGRAM_ID)?,
            checksum: field(CHECKSUM)?,
            customer_id: customer_id
                .parse()
                .map_err(|_| corrupt(CUSTOMER_ID, &customer_id))?,
            customer_name: field(CUSTOMER_NAME)?,
            program_name: field(PROGRAM_NAME)?,
            is_valid: valid.parse().map_err(|_| corrupt(VALID, &valid))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    use super::*;

    fn message() -> TrackingMessage {
        TrackingMessage {
            program_id: "p1".to_string(),
            checksum: "check123".to_string(),
            customer_id: 1234,
            customer_name: "myCustomer".to_string(),
            program_name: "myProgram".to_string(),
            is_valid: true,
        }
    }

    #[test]
    fn test_json_keys() {
        assert_json_eq!(
            serde_json::to_value(message()).unwrap(),
            json!({
                "programId": "p1",
                "checksum": "check123",
                "customerId": 1234,
                "customerName": "myCustomer",
                "programName": "myProgram",
                "valid": true
            })
        );
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let parsed: TrackingMessage = serde_json::from_str(r#"{"programId": "p1"}"#).unwrap();

        assert_eq!(
            parsed,
            TrackingMessage {
                program_id: "p1".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_field_map_values_are_plain_strings() {
        let fields: HashMap<&str, String> = message().field_map().into_iter().collect();

        assert_eq!(fields.len(), 6);
        assert_eq!(fields["programId"], "p1");
        assert_eq!(fields["customerId"], "1234");
        assert_eq!(fields["valid"], "true");
        assert_eq!(fields["customerName"], "myCustomer");
    }

    #[test]
    fn test_field_map_reads_back() {
        let mut message = message();
        message.is_valid = false;
        message.customer_id = -7;
        let fields: HashMap<String, String> = message
            .field_map()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        assert_eq!(
            TrackingMessage::from_field_map("p1", &fields).unwrap(),
            message
        );
    }

    #[test]
    fn test_field_map_with_bad_customer_id_is_corrupt() {
        let mut fields: HashMap<String, String> = message()
            .field_map()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        fields.insert("customerId".to_string(), "\"1234\"".to_string());

        assert!(matches!(
            TrackingMessage::from_field_map("p1", &fields),
            Err(SinkError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_empty_field_map_is_corrupt() {
        assert!(matches!(
            TrackingMessage::from_field_map("p1", &HashMap::new()),
            Err(SinkError::Corrupt { .. })
        ));
    }
}
