//! Record codec
//!
//! Converts records to and from single text lines.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DaylogError, Result};

/// Encode a record as one line of compact JSON (no trailing newline)
pub fn encode<T: Serialize + ?Sized>(record: &T) -> Result<String> {
    let line = serde_json::to_string(record)
        .map_err(|e| DaylogError::Encoding(e.to_string()))?;

    // One record, one line
    if line.contains(['\n', '\r']) {
        return Err(DaylogError::Encoding(
            "encoded record contains a line terminator".to_string(),
        ));
    }

    Ok(line)
}

/// Decode one line back into a record
pub fn decode<T: DeserializeOwned>(line: &str) -> Result<T> {
    serde_json::from_str(line.trim()).map_err(|e| DaylogError::Decoding(e.to_string()))
}
