//! Client Module
//!
//! The public set/get/delete API.
//!
//! ## Responsibilities
//! - Validate keys and values before anything touches the wire
//! - Run exactly one round trip per operation through the serializer
//! - Own the connection lifecycle (open on construction, close once)

use crate::config::{ClientConfig, ServerAddr};
use crate::error::{ChxError, Result};
use crate::network::{Connection, RequestSerializer};
use crate::protocol::{is_line_padding, Command};

/// Thread-safe client for the CHX server
///
/// Share one instance across threads (by reference or in an `Arc`); requests
/// are serialized over its single connection.
///
/// ```no_run
/// use chx::ChxClient;
///
/// let client = ChxClient::connect(Some("127.0.0.1:3800"))?;
/// client.set("greeting", "hello")?;
/// assert_eq!(client.get("greeting")?, Some("hello".to_string()));
/// client.delete("greeting")?;
/// client.close()?;
/// # Ok::<(), chx::ChxError>(())
/// ```
pub struct ChxClient {
    requests: RequestSerializer,
    server_addr: ServerAddr,
}

impl ChxClient {
    /// Connect to `address` (`host:port`) with default settings
    ///
    /// `None` or `""` connects to [`DEFAULT_ADDR`](crate::config::DEFAULT_ADDR).
    pub fn connect(address: Option<&str>) -> Result<Self> {
        let server_addr = ServerAddr::parse(address)?;
        let config = ClientConfig::builder()
            .server_addr(server_addr.to_string())
            .build();
        Self::with_config(config)
    }

    /// Connect using a full configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let server_addr = config.parsed_addr()?;
        let connection = Connection::open(&config)?;
        let requests = RequestSerializer::new(connection)?;

        tracing::debug!("Client ready for {}", server_addr);
        Ok(Self {
            requests,
            server_addr,
        })
    }

    /// Store `value` under `key`
    ///
    /// Does nothing if either is empty. The server's acknowledgement is not
    /// surfaced.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() || value.is_empty() {
            return Ok(());
        }
        check_key(key)?;
        check_value(value)?;

        self.requests.execute(&Command::Set {
            key: key.to_string(),
            value: value.to_string(),
        })?;
        Ok(())
    }

    /// Fetch the value stored under `key`
    ///
    /// `Ok(None)` means the server sent no value, or `key` was empty.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        if key.is_empty() {
            return Ok(None);
        }
        check_key(key)?;

        let response = self.requests.execute(&Command::Get {
            key: key.to_string(),
        })?;
        Ok(response.into_value())
    }

    /// Remove `key`; does nothing if it is empty
    pub fn delete(&self, key: &str) -> Result<()> {
        if key.is_empty() {
            return Ok(());
        }
        check_key(key)?;

        self.requests.execute(&Command::Delete {
            key: key.to_string(),
        })?;
        Ok(())
    }

    /// Close the connection. Safe to call more than once.
    pub fn close(&self) -> Result<()> {
        self.requests.close()
    }

    /// True once `close()` ran or an I/O failure broke the connection
    pub fn is_closed(&self) -> bool {
        self.requests.is_closed()
    }

    pub fn server_addr(&self) -> &ServerAddr {
        &self.server_addr
    }
}

impl Drop for ChxClient {
    fn drop(&mut self) {
        if let Err(e) = self.requests.close() {
            tracing::debug!("Error closing client for {}: {}", self.server_addr, e);
        }
    }
}

/// Keys become a single wire field: no whitespace at all
fn check_key(key: &str) -> Result<()> {
    if key.chars().any(char::is_whitespace) {
        return Err(ChxError::InvalidInput(format!(
            "key {:?} contains whitespace",
            key
        )));
    }
    Ok(())
}

/// Values end the line: no spaces or line breaks, and no trailing padding
/// the response decoder would strip on the way back
fn check_value(value: &str) -> Result<()> {
    if value.contains([' ', '\r', '\n']) {
        return Err(ChxError::InvalidInput(format!(
            "value {:?} contains a space or line break",
            value
        )));
    }
    if value.ends_with(is_line_padding) {
        return Err(ChxError::InvalidInput(format!(
            "value {:?} ends with a control character",
            value
        )));
    }
    Ok(())
}
