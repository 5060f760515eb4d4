//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Simple Binary)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: WRITE  - Payload: record JSON
//! - 0x02: READ   - Payload: date_len (4) + date + page (4) + page_size (4)
//! - 0x03: DELETE - Payload: date_len (4) + date + line (4)
//! - 0x04: PING   - Payload: empty
//!
//! An empty date means "today (UTC)".
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK          (READ: page as JSON, PING: "PONG")
//! - 0x01: NOT_FOUND
//! - 0x02: ERROR       (payload: message)
//! - 0x03: BAD_REQUEST (payload: message)

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Response, Status};
pub use codec::{
    encode_command, decode_command, encode_response, decode_response,
    read_command, write_command, read_response, write_response,
    HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
