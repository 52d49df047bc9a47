//! Protocol Module
//!
//! Defines the line-oriented text protocol spoken with the CHX server.
//!
//! ## Request Format
//! ```text
//! S <key> <value>\n     set
//! G <key>\n             get
//! D <key>\n             delete
//! ```
//!
//! Fields are separated by a single space. Nothing is escaped, so keys may
//! not contain whitespace and values may not contain spaces or line breaks,
//! nor end in an ASCII control character.
//!
//! ## Response Format
//! One line per command. A line whose first character, after ASCII padding, is
//! the sentinel `>` carries a value: the rest of the line, minus trailing padding.
//! Any other line means "no value".

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::Response;
pub use codec::{
    decode_command, decode_response, encode_command, encode_response, is_line_padding, read_line,
    ABSENT_LINE, ACK_LINE, SENTINEL,
};
