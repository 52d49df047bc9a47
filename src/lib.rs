//! # CHX
//!
//! A thread-safe client for the CHX key-value server:
//! - Line-oriented text protocol (`S`/`G`/`D` commands, `>`-prefixed values)
//! - One persistent TCP connection shared by any number of threads
//! - Strictly one request in flight, serialized by a single lock
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Caller Threads                           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  set / get / delete
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       ChxClient                              │
//! │           (validation, encode / decode)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  RequestSerializer                           │
//! │          (Mutex over write-then-read)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                ┌──────▼──────┐
//!                │ Connection  │
//!                │ (TcpStream) │
//!                └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ChxError, Result};
pub use config::{ClientConfig, ServerAddr};
pub use client::ChxClient;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the CHX client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
