//! Tests for ChxClient
//!
//! These tests verify:
//! - set/get/delete round trips
//! - Validation no-ops never reach the server
//! - Mutual exclusion with many concurrent callers
//! - Closed-client behavior
//! - Construction failures

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;
use std::thread;

use chx::{ChxClient, ChxError, ClientConfig};
use common::{unused_address, Mode, MockServer};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup() -> (MockServer, ChxClient) {
    let server = MockServer::start();
    let client = ChxClient::connect(Some(server.address().as_str())).unwrap();
    (server, client)
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_set_then_get() {
    let (_server, client) = setup();

    client.set("greeting", "hello").unwrap();
    assert_eq!(client.get("greeting").unwrap(), Some("hello".to_string()));
}

#[test]
fn test_get_missing_key() {
    let (_server, client) = setup();
    assert_eq!(client.get("non-existent-key").unwrap(), None);
}

#[test]
fn test_set_overwrites() {
    let (_server, client) = setup();

    client.set("k", "first").unwrap();
    client.set("k", "second").unwrap();
    assert_eq!(client.get("k").unwrap(), Some("second".to_string()));
}

#[test]
fn test_delete_removes() {
    let (server, client) = setup();

    client.set("doomed", "value").unwrap();
    client.delete("doomed").unwrap();

    assert_eq!(client.get("doomed").unwrap(), None);
    assert_eq!(server.stored("doomed"), None);
}

#[test]
fn test_delete_missing_key_is_ok() {
    let (_server, client) = setup();

    client.delete("never-set").unwrap();
    client.delete("never-set").unwrap();
    assert_eq!(client.get("never-set").unwrap(), None);
}

#[test]
fn test_many_keys_round_trip() {
    let (_server, client) = setup();

    for i in 0..50 {
        client.set(&format!("key-{}", i), &format!("value-{}", i)).unwrap();
    }
    for i in 0..50 {
        assert_eq!(
            client.get(&format!("key-{}", i)).unwrap(),
            Some(format!("value-{}", i))
        );
    }
}

#[test]
fn test_fragmented_server_responses() {
    let server = MockServer::start_with(Mode::Fragmented);
    let client = ChxClient::connect(Some(server.address().as_str())).unwrap();

    client.set("slow", "arrives-one-byte-at-a-time").unwrap();
    assert_eq!(
        client.get("slow").unwrap(),
        Some("arrives-one-byte-at-a-time".to_string())
    );
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_empty_inputs_are_no_ops() {
    let (server, client) = setup();

    client.set("", "some-value").unwrap();
    client.set("some-key", "").unwrap();
    client.set("", "").unwrap();
    assert_eq!(client.get("").unwrap(), None);
    client.delete("").unwrap();

    assert_eq!(server.commands_received(), 0);
    assert_eq!(server.stored("some-key"), None);
}

#[test]
fn test_delimiters_rejected() {
    let (server, client) = setup();

    assert!(matches!(client.set("a b", "v"), Err(ChxError::InvalidInput(_))));
    assert!(matches!(client.set("k", "v\nD k"), Err(ChxError::InvalidInput(_))));
    assert!(matches!(client.set("k", "two words"), Err(ChxError::InvalidInput(_))));
    assert!(matches!(client.get("k\n"), Err(ChxError::InvalidInput(_))));
    assert!(matches!(client.delete("k\tk"), Err(ChxError::InvalidInput(_))));

    assert_eq!(server.commands_received(), 0);

    // Rejection does not break the connection
    client.set("k", "v").unwrap();
    assert_eq!(client.get("k").unwrap(), Some("v".to_string()));
}

#[test]
fn test_unicode_whitespace_value_round_trips() {
    let (server, client) = setup();

    client.set("nbsp", "x\u{a0}").unwrap();
    assert_eq!(server.stored("nbsp"), Some("x\u{a0}".to_string()));
    assert_eq!(client.get("nbsp").unwrap(), Some("x\u{a0}".to_string()));

    client.set("em", "\u{2003}y\u{2003}").unwrap();
    assert_eq!(client.get("em").unwrap(), Some("\u{2003}y\u{2003}".to_string()));
}

#[test]
fn test_trailing_control_character_rejected() {
    let (server, client) = setup();

    assert!(matches!(client.set("k", "v\t"), Err(ChxError::InvalidInput(_))));
    assert!(matches!(client.set("k", "v\x01"), Err(ChxError::InvalidInput(_))));
    assert_eq!(server.commands_received(), 0);

    // Interior control characters survive the trip
    client.set("k", "a\tb").unwrap();
    assert_eq!(client.get("k").unwrap(), Some("a\tb".to_string()));
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_callers_no_cross_talk() {
    let (server, client) = setup();
    let callers = 100;

    crossbeam::thread::scope(|s| {
        for i in 0..callers {
            let client = &client;
            s.spawn(move |_| {
                let key = format!("thread-test-{}", i);
                let value = format!("value{}", i);
                client.set(&key, &value).unwrap();
                assert_eq!(client.get(&key).unwrap(), Some(value));
                client.delete(&key).unwrap();
            });
        }
    })
    .unwrap();

    for i in 0..callers {
        assert_eq!(client.get(&format!("thread-test-{}", i)).unwrap(), None);
    }
    assert_eq!(server.commands_received(), callers * 4);
}

#[test]
fn test_shared_through_arc() {
    let (_server, client) = setup();
    let client = Arc::new(client);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let client = Arc::clone(&client);
            thread::spawn(move || {
                for j in 0..25 {
                    let key = format!("key-{}-{}", t, j);
                    let value = format!("value-{}-{}", t, j);
                    client.set(&key, &value).unwrap();
                    assert_eq!(client.get(&key).unwrap(), Some(value));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_operations_after_close_fail() {
    let (_server, client) = setup();
    client.close().unwrap();

    assert!(client.is_closed());
    assert!(client.set("k", "v").unwrap_err().is_closed());
    assert!(client.get("k").unwrap_err().is_closed());
    assert!(client.delete("k").unwrap_err().is_closed());
}

#[test]
fn test_close_twice() {
    let (_server, client) = setup();
    client.close().unwrap();
    client.close().unwrap();
}

#[test]
fn test_server_hang_up_breaks_client() {
    let server = MockServer::start_with(Mode::HangUp);
    let client = ChxClient::connect(Some(server.address().as_str())).unwrap();

    assert!(matches!(client.get("k"), Err(ChxError::Io(_))));
    assert!(client.is_closed());
    assert!(client.get("k").unwrap_err().is_closed());
}

#[test]
fn test_read_timeout_surfaces_as_io_error() {
    let server = MockServer::start_with(Mode::Silent);
    let config = ClientConfig::builder()
        .server_addr(server.address())
        .read_timeout_ms(100)
        .build();
    let client = ChxClient::with_config(config).unwrap();

    assert!(matches!(client.set("k", "v"), Err(ChxError::Io(_))));
    assert!(client.is_closed());
}

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn test_bad_address_rejected() {
    let result = ChxClient::connect(Some("not-an-address"));
    match result {
        Err(ChxError::AddressFormat(addr)) => assert_eq!(addr, "not-an-address"),
        Err(other) => panic!("Expected AddressFormat, got {:?}", other),
        Ok(_) => panic!("Expected AddressFormat, got a client"),
    }
}

#[test]
fn test_connection_failed() {
    for address in [unused_address(), "127.0.0.1:1".to_string()] {
        match ChxClient::connect(Some(address.as_str())) {
            Err(ChxError::ConnectionFailed { addr, .. }) => assert_eq!(addr, address),
            Err(other) => panic!("Expected ConnectionFailed, got {:?}", other),
            Ok(_) => panic!("Expected ConnectionFailed for {}", address),
        }
    }
}

#[test]
fn test_server_addr_reported() {
    let (server, client) = setup();
    assert_eq!(client.server_addr().to_string(), server.address());
}
