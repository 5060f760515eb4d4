//! Tests for the record codec
//!
//! These tests verify:
//! - Records survive encode → decode unchanged
//! - Encoded records are always a single line
//! - Malformed lines are rejected with a decoding error

use daylog::record::{decode, encode, LogRecord};
use daylog::DaylogError;
use serde::{Deserialize, Serialize};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn sample_record() -> LogRecord {
    LogRecord::new(json!({
        "uuid": "4f1c2b7e-0000-4000-8000-000000000001",
        "project": "billing",
        "level": "error",
        "timestamp": "2024-05-01T12:00:00Z",
        "message": "payment gateway timeout",
        "code": 504,
        "file": "/srv/app/Gateway.php",
        "line": 88,
        "trace": [
            {"file": "/srv/app/Gateway.php", "line": 88, "function": "charge", "class": "Gateway"}
        ],
        "context": {"order_id": 1234, "retry": true, "tags": ["a", "b"]},
        "server": {"hostname": "web-1", "ip": "10.0.0.5", "php_version": "8.2.1"}
    }))
}

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_round_trip_nested_record() {
    let record = sample_record();
    let line = encode(&record).unwrap();
    let decoded: LogRecord = decode(&line).unwrap();

    assert_eq!(decoded, record);
}

#[test]
fn test_round_trip_typed_struct() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        level: String,
        message: String,
        code: i64,
    }

    let entry = Entry {
        level: "warn".to_string(),
        message: "disk at 91%".to_string(),
        code: 0,
    };

    let line = encode(&entry).unwrap();
    let decoded: Entry = decode(&line).unwrap();
    assert_eq!(decoded, entry);
}

#[test]
fn test_record_is_opaque() {
    // Non-object values are stored as-is
    let record = LogRecord::new(json!(["just", "an", "array"]));
    let decoded: LogRecord = decode(&encode(&record).unwrap()).unwrap();

    assert_eq!(decoded, record);
    assert!(decoded.get("level").is_none());
}

// =============================================================================
// Single-line Invariant Tests
// =============================================================================

#[test]
fn test_multiline_message_stays_on_one_line() {
    let record = LogRecord::new(json!({
        "message": "Stack trace:\n#0 main()\r\n#1 {main}",
    }));
    let line = encode(&record).unwrap();

    assert!(!line.contains('\n'));
    assert!(!line.contains('\r'));

    let decoded: LogRecord = decode(&line).unwrap();
    assert_eq!(
        decoded.get("message").and_then(|v| v.as_str()),
        Some("Stack trace:\n#0 main()\r\n#1 {main}")
    );
}

#[test]
fn test_decode_tolerates_trailing_whitespace() {
    let decoded: LogRecord = decode("{\"level\":\"info\"}  \r").unwrap();
    assert_eq!(decoded, LogRecord::new(json!({"level": "info"})));
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_decode_garbage_fails() {
    let result: daylog::Result<LogRecord> = decode("not json at all");
    assert!(matches!(result, Err(DaylogError::Decoding(_))));
}

#[test]
fn test_decode_wrong_shape_fails_for_typed_target() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Entry {
        level: String,
    }

    let result: daylog::Result<Entry> = decode("{\"level\": 3}");
    assert!(matches!(result, Err(DaylogError::Decoding(_))));
}

#[test]
fn test_encode_unserializable_fails() {
    use std::collections::HashMap;

    // JSON object keys must be strings
    let mut map: HashMap<(i32, i32), &str> = HashMap::new();
    map.insert((1, 2), "x");

    assert!(matches!(encode(&map), Err(DaylogError::Encoding(_))));
}
