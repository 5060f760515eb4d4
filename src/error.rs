//! Error types for DayLog
//!
//! Provides a unified error type for all operations.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias using DaylogError
pub type Result<T> = std::result::Result<T, DaylogError>;

/// Unified error type for DayLog operations
#[derive(Debug, Error)]
pub enum DaylogError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Decoding error: {0}")]
    Decoding(String),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Partition not found: {date}")]
    NotFound { date: NaiveDate },

    #[error("Line {line} out of range (partition has {total} lines)")]
    OutOfRange { line: usize, total: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("Timed out waiting for {operation}")]
    Timeout { operation: &'static str },

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DaylogError {
    /// Whether the error was caused by the caller's request rather than the store
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DaylogError::OutOfRange { .. }
                | DaylogError::InvalidArgument(_)
                | DaylogError::InvalidDate(_)
                | DaylogError::Encoding(_)
                | DaylogError::Decoding(_)
        )
    }
}
