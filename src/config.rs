//! Configuration for the CHX client
//!
//! Centralized configuration with sensible defaults, plus the `host:port`
//! address grammar the server expects.

use std::fmt;
use std::time::Duration;

use crate::error::{ChxError, Result};

/// Address used when none (or an empty one) is given
pub const DEFAULT_ADDR: &str = "127.0.0.1:3800";

/// Largest response line accepted from the server (512 KiB)
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 512 * 1024;

/// A parsed `host:port` server address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddr {
    pub host: String,
    pub port: u16,
}

impl ServerAddr {
    /// Parse a `host:port` string
    ///
    /// `None` and `""` map to [`DEFAULT_ADDR`]. Exactly one colon is required
    /// and the port must be numeric; no network I/O happens here.
    pub fn parse(address: Option<&str>) -> Result<Self> {
        let address = match address {
            Some(a) if !a.is_empty() => a,
            _ => DEFAULT_ADDR,
        };

        let mut parts = address.split(':');
        let (host, port) = match (parts.next(), parts.next(), parts.next()) {
            (Some(host), Some(port), None) => (host, port),
            _ => return Err(ChxError::AddressFormat(address.to_string())),
        };

        if host.is_empty() {
            return Err(ChxError::AddressFormat(address.to_string()));
        }

        let port = port
            .parse::<u16>()
            .map_err(|_| ChxError::AddressFormat(address.to_string()))?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server address (`host:port`); empty means [`DEFAULT_ADDR`]
    pub server_addr: String,

    /// Connect timeout per resolved address (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Socket read timeout (milliseconds, 0 = block forever)
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds, 0 = block forever)
    pub write_timeout_ms: u64,

    /// Disable Nagle's algorithm
    pub nodelay: bool,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Max bytes in a single response line, newline included
    pub max_response_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: DEFAULT_ADDR.to_string(),
            connect_timeout_ms: 0,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            nodelay: true,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse the configured server address
    pub fn parsed_addr(&self) -> Result<ServerAddr> {
        ServerAddr::parse(Some(&self.server_addr))
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the server address (`host:port`)
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn nodelay(mut self, enabled: bool) -> Self {
        self.config.nodelay = enabled;
        self
    }

    /// Set the response line limit (in bytes)
    pub fn max_response_bytes(mut self, bytes: usize) -> Self {
        self.config.max_response_bytes = bytes;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
