//! Response definitions
//!
//! Represents the single line the server returns for each command.

/// A decoded server response
///
/// Only two shapes exist on the wire: a line opening with the sentinel `>`
/// carries a value, and every other line (not found, acknowledgement,
/// garbage) means no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Sentinel line; holds everything after the `>`
    Present(String),

    /// Any non-sentinel line
    Absent,
}

impl Response {
    /// Create a response carrying a value
    pub fn present(payload: impl Into<String>) -> Self {
        Response::Present(payload.into())
    }

    /// Create a response with no value
    pub fn absent() -> Self {
        Response::Absent
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Response::Present(_))
    }

    /// Borrow the payload, if any
    pub fn payload(&self) -> Option<&str> {
        match self {
            Response::Present(payload) => Some(payload),
            Response::Absent => None,
        }
    }

    /// Consume the response, yielding the payload if present
    pub fn into_value(self) -> Option<String> {
        match self {
            Response::Present(payload) => Some(payload),
            Response::Absent => None,
        }
    }
}

impl From<Option<String>> for Response {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(payload) => Response::Present(payload),
            None => Response::Absent,
        }
    }
}
