//! Network Module
//!
//! The client's side of the TCP link.
//!
//! ## Architecture
//! - One `Connection` per client, owning the stream's read and write halves
//! - A `RequestSerializer` in front of it allowing one request in flight
//! - No worker threads; callers block on their own (or a peer caller's) I/O

mod connection;
mod serializer;

pub use connection::Connection;
pub use serializer::RequestSerializer;
