//! Error types for the CHX client
//!
//! Provides a unified error type for all operations.

use std::io;

use thiserror::Error;

/// Result type alias using ChxError
pub type Result<T> = std::result::Result<T, ChxError>;

/// Unified error type for CHX client operations
#[derive(Debug, Error)]
pub enum ChxError {
    // -------------------------------------------------------------------------
    // Construction Errors
    // -------------------------------------------------------------------------
    #[error("Invalid address format: {0:?}. Expected host:port")]
    AddressFormat(String),

    #[error("Failed to connect to CHX server at {addr}: {source}")]
    ConnectionFailed {
        addr: String,
        #[source]
        source: io::Error,
    },

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // -------------------------------------------------------------------------
    // Input / Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChxError {
    /// The error every wire operation returns once the connection is closed
    pub fn closed() -> Self {
        ChxError::Io(io::Error::new(io::ErrorKind::NotConnected, "connection closed"))
    }

    /// True for the use-after-close error built by [`ChxError::closed`]
    pub fn is_closed(&self) -> bool {
        matches!(self, ChxError::Io(e) if e.kind() == io::ErrorKind::NotConnected)
    }
}
