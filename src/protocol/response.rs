//! Response definitions
//!
//! Represents responses to clients.

use crate::error::DaylogError;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    NotFound = 0x01,
    Error = 0x02,
    BadRequest = 0x03,
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Optional payload (page JSON for READ, error message otherwise)
    pub payload: Option<Vec<u8>>,
}

impl Response {
    /// Create an OK response with optional payload
    pub fn ok(payload: Option<Vec<u8>>) -> Self {
        Self {
            status: Status::Ok,
            payload,
        }
    }

    /// Create a NOT_FOUND response
    pub fn not_found() -> Self {
        Self {
            status: Status::NotFound,
            payload: None,
        }
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: Some(message.as_bytes().to_vec()),
        }
    }

    /// Create a BAD_REQUEST response
    pub fn bad_request(message: &str) -> Self {
        Self {
            status: Status::BadRequest,
            payload: Some(message.as_bytes().to_vec()),
        }
    }

    /// Map an engine error onto a status
    pub fn from_error(error: &DaylogError) -> Self {
        match error {
            DaylogError::NotFound { .. } => Self::not_found(),
            e if e.is_client_error() => Self::bad_request(&e.to_string()),
            e => Self::error(&e.to_string()),
        }
    }

    /// Payload as UTF-8 text (lossy)
    pub fn message(&self) -> String {
        self.payload
            .as_deref()
            .map(|p| String::from_utf8_lossy(p).into_owned())
            .unwrap_or_default()
    }
}
