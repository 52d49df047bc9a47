//! Connection
//!
//! Owns the TCP stream to the server and its blocking primitives.

use std::io::{self, BufReader, BufWriter, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};

use crate::config::{ClientConfig, ServerAddr};
use crate::error::{ChxError, Result};
use crate::protocol::read_line;

/// A single client connection to the server
///
/// Not synchronized on its own; callers share it through
/// [`RequestSerializer`](super::RequestSerializer).
pub struct Connection {
    /// TCP stream reader (buffered so one response may span many reads)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (flushed after every line)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,

    /// Response line limit
    max_response_bytes: usize,

    open: bool,
}

impl Connection {
    /// Connect to the server named in `config`
    ///
    /// Fails with `AddressFormat` before any I/O if the address is malformed
    /// and with `ConnectionFailed` if no resolved address accepts.
    pub fn open(config: &ClientConfig) -> Result<Self> {
        if config.max_response_bytes == 0 {
            return Err(ChxError::Config(
                "max_response_bytes must be greater than zero".to_string(),
            ));
        }

        let addr = config.parsed_addr()?;
        let stream = connect(&addr, config).map_err(|source| ChxError::ConnectionFailed {
            addr: addr.to_string(),
            source,
        })?;

        Self::from_stream(stream, config)
    }

    /// Wrap an already connected stream
    ///
    /// Sets up buffered I/O and configures socket options.
    pub fn from_stream(stream: TcpStream, config: &ClientConfig) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(config.nodelay)?;
        stream.set_read_timeout(config.read_timeout())?;
        stream.set_write_timeout(config.write_timeout())?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
            max_response_bytes: config.max_response_bytes,
            open: true,
        })
    }

    /// Write a full line and flush it
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        if !self.open {
            return Err(ChxError::closed());
        }

        tracing::trace!("-> {}: {:?}", self.peer_addr, line);
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Block until one response line arrives and return its bytes
    ///
    /// Uses the configured limit; see [`Connection::read_response_limited`].
    pub fn read_response(&mut self) -> Result<Vec<u8>> {
        self.read_response_limited(self.max_response_bytes)
    }

    /// Block until one response line of at most `max_bytes` arrives
    ///
    /// A peer that hangs up before sending anything is an error, not an
    /// empty response.
    pub fn read_response_limited(&mut self, max_bytes: usize) -> Result<Vec<u8>> {
        if !self.open {
            return Err(ChxError::closed());
        }

        let line = read_line(&mut self.reader, max_bytes)?;
        tracing::trace!(
            "<- {}: {:?}",
            self.peer_addr,
            String::from_utf8_lossy(&line)
        );
        Ok(line)
    }

    /// Shut down both halves and mark the connection closed
    ///
    /// Idempotent.
    pub fn close(&mut self) -> Result<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;

        match self.writer.get_ref().shutdown(Shutdown::Both) {
            Ok(()) => {}
            // Already torn down by the peer or by an interrupting close
            Err(e) if e.kind() == io::ErrorKind::NotConnected => {}
            Err(e) => return Err(e.into()),
        }

        tracing::debug!("Connection to {} closed", self.peer_addr);
        Ok(())
    }

    /// A second handle on the socket, usable to interrupt blocked I/O
    pub fn try_clone_stream(&self) -> Result<TcpStream> {
        Ok(self.writer.get_ref().try_clone()?)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Try each resolved address in turn, keeping the last failure
fn connect(addr: &ServerAddr, config: &ClientConfig) -> io::Result<TcpStream> {
    let timeout = match config.connect_timeout() {
        Some(timeout) => timeout,
        None => return TcpStream::connect((addr.host.as_str(), addr.port)),
    };

    let mut last_err = None;
    for socket_addr in (addr.host.as_str(), addr.port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&socket_addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("{} did not resolve to any address", addr),
        )
    }))
}
