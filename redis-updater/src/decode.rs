use common_stream::DecodeError;

use crate::event::TrackingMessage;

/// Decode a UTF-8 JSON record payload into a [`TrackingMessage`].
///
/// The program id is the key the event is stored under, so a message without
/// one is rejected.
pub fn decode_tracking_message(payload: &[u8]) -> Result<TrackingMessage, DecodeError> {
    if payload.is_empty() {
        return Err(DecodeError::EmptyPayload);
    }

    let text = std::str::from_utf8(payload)?;
    let message: TrackingMessage = serde_json::from_str(text)?;

    if message.program_id.is_empty() {
        return Err(DecodeError::MissingField("programId"));
    }

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_round_trips_json_encoding() {
        for is_valid in [true, false] {
            let message = TrackingMessage {
                program_id: "p1".to_string(),
                checksum: "check123".to_string(),
                customer_id: 1234,
                customer_name: "myCustomer".to_string(),
                program_name: "myProgram".to_string(),
                is_valid,
            };
            let encoded = serde_json::to_vec(&message).unwrap();

            assert_eq!(decode_tracking_message(&encoded).unwrap(), message);
        }
    }

    #[test]
    fn test_decode_accepts_producer_payload() {
        let payload = br#"{"programId":"12345","programName":"myProgram","checksum":"check123","customerId":1234,"customerName":"myCustomer","valid":true}"#;

        let message = decode_tracking_message(payload).unwrap();

        assert_eq!(message.program_id, "12345");
        assert_eq!(message.customer_id, 1234);
        assert!(message.is_valid);
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        assert!(matches!(
            decode_tracking_message(&[0x7b, 0xff, 0x7d]),
            Err(DecodeError::Utf8(_))
        ));
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        assert!(matches!(
            decode_tracking_message(br#"{"programId": "p1""#),
            Err(DecodeError::Json(_))
        ));
        assert!(matches!(
            decode_tracking_message(br#"{"programId": "p1", "customerId": "1234"}"#),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn test_decode_requires_program_id() {
        assert!(matches!(
            decode_tracking_message(br#"{"checksum": "check123"}"#),
            Err(DecodeError::MissingField("programId"))
        ));
    }

    #[test]
    fn test_decode_rejects_empty_payload() {
        assert!(matches!(
            decode_tracking_message(b""),
            Err(DecodeError::EmptyPayload)
        ));
    }
}
