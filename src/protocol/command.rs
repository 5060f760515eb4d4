//! Command definitions
//!
//! Represents commands from clients.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Write = 0x01,
    Read = 0x02,
    Delete = 0x03,
    Ping = 0x04,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append one JSON record to today's partition
    Write { record: Vec<u8> },

    /// Read one page ("" = today)
    Read {
        date: String,
        page: u32,
        page_size: u32,
    },

    /// Delete a 1-based line ("" = today)
    Delete { date: String, line: u32 },

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Write { .. } => CommandType::Write,
            Command::Read { .. } => CommandType::Read,
            Command::Delete { .. } => CommandType::Delete,
            Command::Ping => CommandType::Ping,
        }
    }
}
