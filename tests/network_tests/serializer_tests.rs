//! Tests for RequestSerializer
//!
//! These tests verify:
//! - One command, one response, paired with the right caller
//! - The lock is released after failures
//! - A failed round trip closes the connection
//! - close() unblocks a caller stuck waiting for a reply

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chx::config::ClientConfig;
use chx::network::{Connection, RequestSerializer};
use chx::protocol::{Command, Response};
use chx::ChxError;
use common::{Mode, MockServer};

// =============================================================================
// Helper Functions
// =============================================================================

fn serializer_for(server: &MockServer) -> RequestSerializer {
    let config = ClientConfig::builder().server_addr(server.address()).build();
    RequestSerializer::new(Connection::open(&config).unwrap()).unwrap()
}

fn set(key: &str, value: &str) -> Command {
    Command::Set {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn get(key: &str) -> Command {
    Command::Get {
        key: key.to_string(),
    }
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_execute_round_trip() {
    let server = MockServer::start();
    let requests = serializer_for(&server);

    assert_eq!(requests.execute(&set("a", "1")).unwrap(), Response::Absent);
    assert_eq!(requests.execute(&get("a")).unwrap(), Response::present("1"));
    assert_eq!(requests.execute(&get("b")).unwrap(), Response::Absent);
}

#[test]
fn test_raw_round_trip() {
    let server = MockServer::start();
    let requests = serializer_for(&server);

    assert_eq!(requests.round_trip("S raw value\n").unwrap(), b"OK\n");
    assert_eq!(requests.round_trip("G raw\n").unwrap(), b">value\n");
}

#[test]
fn test_concurrent_callers_get_their_own_replies() {
    let server = MockServer::start_with(Mode::Fragmented);
    let requests = Arc::new(serializer_for(&server));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let requests = Arc::clone(&requests);
            thread::spawn(move || {
                let key = format!("key-{}", i);
                let value = format!("value-{}", i);
                requests.execute(&set(&key, &value)).unwrap();
                assert_eq!(
                    requests.execute(&get(&key)).unwrap(),
                    Response::Present(value)
                );
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(server.commands_received(), 32);
}

// =============================================================================
// Failure Tests
// =============================================================================

#[test]
fn test_failure_closes_connection_and_releases_lock() {
    let server = MockServer::start_with(Mode::HangUp);
    let requests = serializer_for(&server);

    assert!(matches!(requests.execute(&get("k")), Err(ChxError::Io(_))));
    assert!(requests.is_closed());

    // Lock was released: the next caller fails fast instead of deadlocking
    let err = requests.execute(&get("k")).unwrap_err();
    assert!(err.is_closed());
}

#[test]
fn test_close_unblocks_in_flight_request() {
    let server = MockServer::start_with(Mode::Silent);
    let requests = Arc::new(serializer_for(&server));

    let waiter = {
        let requests = Arc::clone(&requests);
        thread::spawn(move || requests.execute(&get("k")))
    };

    // Let the waiter write its command and block on the read
    while server.commands_received() == 0 {
        thread::sleep(Duration::from_millis(5));
    }
    thread::sleep(Duration::from_millis(50));

    requests.close().unwrap();

    let result = waiter.join().unwrap();
    assert!(result.unwrap_err().is_closed());
    assert!(requests.is_closed());
}

#[test]
fn test_close_is_idempotent() {
    let server = MockServer::start();
    let requests = serializer_for(&server);

    requests.close().unwrap();
    requests.close().unwrap();

    assert!(requests.execute(&get("k")).unwrap_err().is_closed());
}
