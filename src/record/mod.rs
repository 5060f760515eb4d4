//! Record Module
//!
//! Opaque structured log records and their one-line text encoding.
//!
//! ## Line Format
//! Each record is stored as compact JSON followed by `\n` (JSON Lines).
//! Compact JSON escapes control characters inside strings, so a record
//! never spans more than one line.

mod codec;

pub use codec::{decode, encode};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An opaque, arbitrarily nested log record
///
/// The store never inspects the fields; it only moves the value between
/// the ingest boundary and disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRecord(Value);

impl LogRecord {
    /// Wrap an already-parsed JSON value
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the underlying value
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Unwrap into the underlying value
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Look up a top-level field, if the record is an object
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

impl From<Value> for LogRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
