//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Payload by Command Type
//! - WRITE:  record bytes
//! - READ:   date_len (4 bytes) + date + page (4 bytes) + page_size (4 bytes)
//! - DELETE: date_len (4 bytes) + date + line (4 bytes)
//! - PING:   empty
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```

use std::io::{Read, Write};
use crate::error::{DaylogError, Result};
use super::{Command, Response, Status};

/// Header size: 1 byte command/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: cmd_type (1) + payload_len (4) + payload
pub fn encode_command(command: &Command) -> Vec<u8> {
    let cmd_type = command.command_type() as u8;

    // Build payload based on command type
    let payload = match command {
        Command::Write { record } => record.clone(),
        Command::Read { date, page, page_size } => {
            let mut payload = Vec::with_capacity(12 + date.len());
            put_date(&mut payload, date);
            payload.extend_from_slice(&page.to_be_bytes());
            payload.extend_from_slice(&page_size.to_be_bytes());
            payload
        }
        Command::Delete { date, line } => {
            let mut payload = Vec::with_capacity(8 + date.len());
            put_date(&mut payload, date);
            payload.extend_from_slice(&line.to_be_bytes());
            payload
        }
        Command::Ping => Vec::new(),
    };

    frame(cmd_type, &payload)
}

/// Decode a command from bytes
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let (cmd_type, payload) = split_frame(bytes, "command")?;

    // Parse command based on type
    match cmd_type {
        0x01 => decode_write_command(payload),
        0x02 => decode_read_command(payload),
        0x03 => decode_delete_command(payload),
        0x04 => decode_ping_command(payload),
        _ => Err(DaylogError::Protocol(format!(
            "Unknown command type: 0x{:02x}",
            cmd_type
        ))),
    }
}

/// Decode WRITE command payload
fn decode_write_command(payload: &[u8]) -> Result<Command> {
    if payload.is_empty() {
        return Err(DaylogError::Protocol(
            "WRITE command: empty record".to_string(),
        ));
    }
    Ok(Command::Write {
        record: payload.to_vec(),
    })
}

/// Decode READ command payload
fn decode_read_command(payload: &[u8]) -> Result<Command> {
    let (date, rest) = take_date(payload, "READ")?;
    if rest.len() != 8 {
        return Err(DaylogError::Protocol(format!(
            "READ command: expected 8 bytes of paging, got {}",
            rest.len()
        )));
    }

    let page = be_u32(&rest[0..4]);
    let page_size = be_u32(&rest[4..8]);
    Ok(Command::Read { date, page, page_size })
}

/// Decode DELETE command payload
fn decode_delete_command(payload: &[u8]) -> Result<Command> {
    let (date, rest) = take_date(payload, "DELETE")?;
    if rest.len() != 4 {
        return Err(DaylogError::Protocol(format!(
            "DELETE command: expected 4 byte line number, got {}",
            rest.len()
        )));
    }

    Ok(Command::Delete {
        date,
        line: be_u32(rest),
    })
}

/// Decode PING command payload
fn decode_ping_command(payload: &[u8]) -> Result<Command> {
    if !payload.is_empty() {
        return Err(DaylogError::Protocol(format!(
            "PING command: unexpected payload of {} bytes",
            payload.len()
        )));
    }
    Ok(Command::Ping)
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_response(response: &Response) -> Vec<u8> {
    let payload = response.payload.as_deref().unwrap_or(&[]);
    frame(response.status as u8, payload)
}

/// Decode a response from bytes
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let (status_byte, payload) = split_frame(bytes, "response")?;

    // Parse status
    let status = match status_byte {
        0x00 => Status::Ok,
        0x01 => Status::NotFound,
        0x02 => Status::Error,
        0x03 => Status::BadRequest,
        _ => {
            return Err(DaylogError::Protocol(format!(
                "Unknown response status: 0x{:02x}",
                status_byte
            )))
        }
    };

    let payload = if payload.is_empty() {
        None
    } else {
        Some(payload.to_vec())
    };

    Ok(Response { status, payload })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let message = read_frame(reader, "command")?;
    decode_command(&message)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let message = read_frame(reader, "response")?;
    decode_response(&message)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let bytes = encode_response(response);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Framing helpers
// =============================================================================

/// Build header + payload
fn frame(kind: u8, payload: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(kind);
    message.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    message.extend_from_slice(payload);
    message
}

/// Validate a complete frame and split it into (kind, payload)
fn split_frame<'a>(bytes: &'a [u8], what: &str) -> Result<(u8, &'a [u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(DaylogError::Protocol(format!(
            "Incomplete {} header: expected {} bytes, got {}",
            what,
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let payload_len = be_u32(&bytes[1..5]);
    check_payload_len(payload_len, what)?;

    let total_len = HEADER_SIZE + payload_len as usize;
    if bytes.len() < total_len {
        return Err(DaylogError::Protocol(format!(
            "Incomplete {} payload: expected {} bytes, got {}",
            what,
            total_len,
            bytes.len()
        )));
    }

    Ok((bytes[0], &bytes[HEADER_SIZE..total_len]))
}

/// Read one frame (header, then payload) from a stream
fn read_frame<R: Read>(reader: &mut R, what: &str) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = be_u32(&header[1..5]);
    check_payload_len(payload_len, what)?;

    let mut message = vec![0u8; HEADER_SIZE + payload_len as usize];
    message[..HEADER_SIZE].copy_from_slice(&header);
    if payload_len > 0 {
        reader.read_exact(&mut message[HEADER_SIZE..])?;
    }

    Ok(message)
}

fn check_payload_len(len: u32, what: &str) -> Result<()> {
    if len > MAX_PAYLOAD_SIZE {
        return Err(DaylogError::Protocol(format!(
            "{} payload too large: {} bytes (max {})",
            what, len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(())
}

fn put_date(payload: &mut Vec<u8>, date: &str) {
    payload.extend_from_slice(&(date.len() as u32).to_be_bytes());
    payload.extend_from_slice(date.as_bytes());
}

/// Split a length-prefixed UTF-8 date off the front of a payload
fn take_date<'a>(payload: &'a [u8], command: &str) -> Result<(String, &'a [u8])> {
    if payload.len() < 4 {
        return Err(DaylogError::Protocol(format!(
            "{} command: missing date length",
            command
        )));
    }

    let date_len = be_u32(&payload[0..4]) as usize;
    if payload.len() - 4 < date_len {
        return Err(DaylogError::Protocol(format!(
            "{} command: incomplete date (expected {}, got {})",
            command,
            date_len,
            payload.len() - 4
        )));
    }

    let date = std::str::from_utf8(&payload[4..4 + date_len])
        .map_err(|e| DaylogError::Protocol(format!("{} command: date is not UTF-8: {}", command, e)))?
        .to_string();

    Ok((date, &payload[4 + date_len..]))
}

fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
