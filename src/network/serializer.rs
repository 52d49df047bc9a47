//! Request Serializer
//!
//! Turns concurrent callers into a strict one-at-a-time request/response
//! sequence on a single [`Connection`].

use std::io;
use std::net::{Shutdown, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::{ChxError, Result};
use crate::protocol::{decode_response, encode_command, Command, Response};
use super::Connection;

/// Serializes write-then-read round trips over one connection
///
/// ## Concurrency Model
///
/// - `connection` is guarded by a single `Mutex`, held from the first byte
///   written until the response line is read. A caller's response is
///   therefore always the reply to its own command.
/// - The guard is dropped on every exit path, including errors, so a failed
///   caller never blocks the ones queued behind it.
/// - `close()` first shuts the socket down through `interrupt`, which fails
///   any in-flight read or write, then waits for the lock. It writes no
///   bytes, so it cannot interleave with a command on the wire.
pub struct RequestSerializer {
    connection: Mutex<Connection>,

    /// Duplicate socket handle used only to interrupt blocked I/O
    interrupt: TcpStream,

    /// Set once by `close()` or by a failed round trip
    closed: AtomicBool,

    peer_addr: String,
}

impl RequestSerializer {
    pub fn new(connection: Connection) -> Result<Self> {
        let interrupt = connection.try_clone_stream()?;
        let peer_addr = connection.peer_addr().to_string();

        Ok(Self {
            connection: Mutex::new(connection),
            interrupt,
            closed: AtomicBool::new(false),
            peer_addr,
        })
    }

    /// Encode `command`, run one round trip, decode the reply
    ///
    /// Encoding and decoding happen outside the lock.
    pub fn execute(&self, command: &Command) -> Result<Response> {
        let line = encode_command(command);
        let raw = self.round_trip(&line)?;
        Ok(decode_response(&raw))
    }

    /// Write `line` and read exactly one response line, atomically
    ///
    /// If either half fails the stream can no longer be trusted to pair
    /// commands with replies, so the connection is closed and every later
    /// call fails with the closed error.
    pub fn round_trip(&self, line: &str) -> Result<Vec<u8>> {
        if self.is_closed() {
            return Err(ChxError::closed());
        }

        let mut connection = self.connection.lock();
        if self.is_closed() || !connection.is_open() {
            return Err(ChxError::closed());
        }

        let result = connection
            .write_line(line)
            .and_then(|()| connection.read_response());

        if let Err(e) = &result {
            // Interrupted by close(); report it as such
            if self.closed.load(Ordering::Acquire) {
                return Err(ChxError::closed());
            }

            tracing::warn!(
                "Request to {} failed, closing connection: {}",
                self.peer_addr,
                e
            );
            self.closed.store(true, Ordering::Release);
            if let Err(close_err) = connection.close() {
                tracing::debug!("Error closing {}: {}", self.peer_addr, close_err);
            }
        }

        result
    }

    /// Close the connection
    ///
    /// Idempotent. Safe to call while another thread is mid round trip:
    /// that caller fails with the closed error instead of hanging.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        match self.interrupt.shutdown(Shutdown::Both) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotConnected => {}
            Err(e) => tracing::debug!("Error interrupting {}: {}", self.peer_addr, e),
        }

        self.connection.lock().close()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
