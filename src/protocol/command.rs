//! Command definitions
//!
//! Represents requests sent to the server.

/// Command types, tagged by their wire letter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Set = b'S',
    Get = b'G',
    Delete = b'D',
}

impl CommandType {
    /// The single-letter tag that opens the command line
    pub fn tag(self) -> char {
        self as u8 as char
    }

    /// Look up a command type by its wire tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "S" => Some(CommandType::Set),
            "G" => Some(CommandType::Get),
            "D" => Some(CommandType::Delete),
            _ => None,
        }
    }
}

/// An outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Store a value under a key
    Set { key: String, value: String },

    /// Fetch the value for a key
    Get { key: String },

    /// Remove a key
    Delete { key: String },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Set { .. } => CommandType::Set,
            Command::Get { .. } => CommandType::Get,
            Command::Delete { .. } => CommandType::Delete,
        }
    }
}
