//! Message decoder
//!
//! One line of text in, one strongly-typed `Message` out.

use contracts::{Message, MessageKind, TargetError};
use serde_json::Value;

/// Decode one input line
///
/// # Errors
/// - `Parse` if the line is not valid JSON
/// - `Protocol` if the JSON is not a recognized, complete message
pub fn decode(line: &str) -> Result<Message, TargetError> {
    let value: Value =
        serde_json::from_str(line).map_err(|e| TargetError::parse(line, e.to_string()))?;
    decode_value(value)
}

/// Decode an already parsed JSON value
pub fn decode_value(value: Value) -> Result<Message, TargetError> {
    let kind = message_kind(&value)?;

    let message: Message = serde_json::from_value(value)
        .map_err(|e| TargetError::protocol(format!("invalid {kind} message: {e}")))?;

    if let Some(stream) = message.stream() {
        if stream.is_empty() {
            return Err(TargetError::protocol(format!(
                "invalid {kind} message: 'stream' must not be empty"
            )));
        }
    }

    Ok(message)
}

/// Read and check the `type` discriminator
fn message_kind(value: &Value) -> Result<MessageKind, TargetError> {
    let obj = value.as_object().ok_or_else(|| {
        TargetError::protocol(format!("message must be a JSON object, got {}", type_name(value)))
    })?;

    let tag = match obj.get("type") {
        Some(Value::String(tag)) => tag,
        Some(other) => {
            return Err(TargetError::protocol(format!(
                "message 'type' must be a string, got {}",
                type_name(other)
            )))
        }
        None => {
            return Err(TargetError::protocol(
                "message is missing required key 'type'",
            ))
        }
    };

    match tag.as_str() {
        "SCHEMA" => Ok(MessageKind::Schema),
        "RECORD" => Ok(MessageKind::Record),
        "STATE" => Ok(MessageKind::State),
        "ACTIVATE_VERSION" => Ok(MessageKind::ActivateVersion),
        other => Err(TargetError::protocol(format!("unknown message type '{other}'"))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn protocol_message(line: &str) -> String {
        match decode(line) {
            Err(TargetError::Protocol { message }) => message,
            other => panic!("expected protocol error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_schema() {
        let line = r#"{"type":"SCHEMA","stream":"users","schema":{"type":"object"},"key_properties":["id"]}"#;
        match decode(line).unwrap() {
            Message::Schema(m) => {
                assert_eq!(m.stream, "users");
                assert_eq!(m.schema, json!({"type": "object"}));
                assert_eq!(m.key_properties, vec!["id".to_string()]);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_decode_schema_with_empty_key_properties() {
        let line = r#"{"type":"SCHEMA","stream":"s","schema":{},"key_properties":[]}"#;
        let msg = decode(line).unwrap();
        assert_eq!(msg.kind(), MessageKind::Schema);
    }

    #[test]
    fn test_decode_record() {
        let line = r#"{"type":"RECORD","stream":"users","record":{"id":1,"name":"a"},"version":2}"#;
        match decode(line).unwrap() {
            Message::Record(m) => {
                assert_eq!(m.stream, "users");
                assert_eq!(m.record.get("id"), Some(&json!(1)));
                assert_eq!(m.version, Some(2));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_decode_state_with_any_value() {
        for value in [json!({"users": 1}), json!(null), json!([1, 2]), json!("opaque")] {
            let line = json!({"type": "STATE", "value": value}).to_string();
            match decode(&line).unwrap() {
                Message::State(m) => assert_eq!(m.value, value),
                other => panic!("unexpected message: {other:?}"),
            }
        }
    }

    #[test]
    fn test_decode_activate_version() {
        let line = r#"{"type":"ACTIVATE_VERSION","stream":"users","version":1588}"#;
        match decode(line).unwrap() {
            Message::ActivateVersion(m) => assert_eq!(m.version, 1588),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = decode(r#"{"type":"RECORD","stream":"#).unwrap_err();
        assert!(matches!(err, TargetError::Parse { .. }));
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn test_empty_line_is_parse_error() {
        assert!(matches!(decode("").unwrap_err(), TargetError::Parse { .. }));
    }

    #[test]
    fn test_missing_type() {
        let msg = protocol_message(r#"{"stream":"users","record":{}}"#);
        assert!(msg.contains("'type'"));
    }

    #[test]
    fn test_unknown_type() {
        let msg = protocol_message(r#"{"type":"BATCH","stream":"users"}"#);
        assert!(msg.contains("BATCH"));
    }

    #[test]
    fn test_lowercase_type_is_unknown() {
        protocol_message(r#"{"type":"record","stream":"users","record":{}}"#);
    }

    #[test]
    fn test_non_string_type() {
        let msg = protocol_message(r#"{"type":7}"#);
        assert!(msg.contains("number"));
    }

    #[test]
    fn test_non_object_message() {
        let msg = protocol_message("[1,2,3]");
        assert!(msg.contains("array"));
    }

    #[test]
    fn test_record_missing_stream() {
        let msg = protocol_message(r#"{"type":"RECORD","record":{"id":1}}"#);
        assert!(msg.contains("stream"));
    }

    #[test]
    fn test_record_missing_record() {
        let msg = protocol_message(r#"{"type":"RECORD","stream":"users"}"#);
        assert!(msg.contains("record"));
    }

    #[test]
    fn test_record_must_be_object() {
        protocol_message(r#"{"type":"RECORD","stream":"users","record":[1]}"#);
    }

    #[test]
    fn test_schema_missing_key_properties() {
        let msg = protocol_message(r#"{"type":"SCHEMA","stream":"users","schema":{}}"#);
        assert!(msg.contains("key_properties"));
    }

    #[test]
    fn test_schema_missing_stream() {
        let msg = protocol_message(r#"{"type":"SCHEMA","schema":{},"key_properties":[]}"#);
        assert!(msg.contains("stream"));
    }

    #[test]
    fn test_empty_stream_rejected() {
        let msg = protocol_message(r#"{"type":"RECORD","stream":"","record":{}}"#);
        assert!(msg.contains("empty"));
    }

    #[test]
    fn test_state_missing_value() {
        let msg = protocol_message(r#"{"type":"STATE"}"#);
        assert!(msg.contains("value"));
    }
}
