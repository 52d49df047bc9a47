//! Protocol codec
//!
//! Encoding and decoding functions for the line protocol, plus the
//! newline-framed reader the connection reads responses with.
//!
//! ## Wire Format
//!
//! ```text
//! ┌─────┬───┬───────┬───┬─────────┬────┐
//! │ tag │ ␠ │  key  │ ␠ │  value  │ \n │     value only for S
//! └─────┴───┴───────┴───┴─────────┴────┘
//! ```

use std::io::{self, BufRead, Read};

use crate::error::{ChxError, Result};
use super::{Command, CommandType, Response};

/// First character of a response line that carries a value
pub const SENTINEL: char = '>';

/// Line a server sends for a key with no value
pub const ABSENT_LINE: &str = "NOT_FOUND";

/// Line a server sends to acknowledge SET and DELETE
pub const ACK_LINE: &str = "OK";

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to its wire line, terminator included
///
/// No escaping is performed; callers must keep delimiters out of keys and
/// values.
pub fn encode_command(command: &Command) -> String {
    let tag = command.command_type().tag();
    match command {
        Command::Set { key, value } => format!("{} {} {}\n", tag, key, value),
        Command::Get { key } | Command::Delete { key } => format!("{} {}\n", tag, key),
    }
}

/// Decode a command line (with or without its terminator)
pub fn decode_command(line: &str) -> Result<Command> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return Err(ChxError::Protocol("Empty command line".to_string()));
    }

    let mut fields = line.splitn(3, ' ');
    let tag = fields.next().unwrap_or_default();
    let key = fields.next().unwrap_or_default();
    let rest = fields.next();

    let command_type = CommandType::from_tag(tag)
        .ok_or_else(|| ChxError::Protocol(format!("Unknown command tag: {:?}", tag)))?;

    if key.is_empty() {
        return Err(ChxError::Protocol(format!(
            "{:?} command: missing key",
            command_type
        )));
    }
    let key = key.to_string();

    match (command_type, rest) {
        (CommandType::Set, Some(value)) if !value.is_empty() => Ok(Command::Set {
            key,
            value: value.to_string(),
        }),
        (CommandType::Set, _) => Err(ChxError::Protocol("Set command: missing value".to_string())),
        (CommandType::Get, None) => Ok(Command::Get { key }),
        (CommandType::Delete, None) => Ok(Command::Delete { key }),
        (command_type, Some(_)) => Err(ChxError::Protocol(format!(
            "{:?} command: unexpected trailing field",
            command_type
        ))),
    }
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to its wire line, terminator included
pub fn encode_response(response: &Response) -> String {
    match response {
        Response::Present(payload) => format!("{}{}\n", SENTINEL, payload),
        Response::Absent => format!("{}\n", ABSENT_LINE),
    }
}

/// Characters stripped from both ends of a response line: ASCII space and
/// every control character below it. Wider Unicode whitespace is payload.
pub fn is_line_padding(c: char) -> bool {
    c <= ' '
}

/// Decode a raw response buffer
///
/// Padding (see [`is_line_padding`]) is trimmed first. Anything not opening
/// with the sentinel decodes to `Absent`, so a missing key and a garbled
/// line look the same.
pub fn decode_response(bytes: &[u8]) -> Response {
    let text = String::from_utf8_lossy(bytes);
    match text.trim_matches(is_line_padding).strip_prefix(SENTINEL) {
        Some(payload) => Response::Present(payload.to_string()),
        None => Response::Absent,
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one newline-terminated line of at most `max_bytes` bytes
///
/// Blocks until the newline arrives, however many transport reads that
/// takes. End of stream before any byte is an error; an unterminated tail
/// before end of stream is returned as the final line.
pub fn read_line<R: BufRead>(reader: &mut R, max_bytes: usize) -> Result<Vec<u8>> {
    let mut line = Vec::new();
    let read = reader
        .by_ref()
        .take(max_bytes as u64)
        .read_until(b'\n', &mut line)?;

    if read == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "server closed connection or sent empty response",
        )
        .into());
    }

    if line.last() != Some(&b'\n') && line.len() >= max_bytes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("response exceeds {} bytes", max_bytes),
        )
        .into());
    }

    Ok(line)
}
