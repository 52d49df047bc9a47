//! CHX Sample Workload
//!
//! Shares one client between many threads. Thread 0 walks a shared key
//! through set/get/delete/get while the others read it, then every thread
//! runs its own set+get pairs and reports mismatches.

use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use chx::ChxClient;
use tracing_subscriber::{fmt, EnvFilter};

const SHARED_KEY: &str = "shared-key-for-delete";
const SHARED_VALUE: &str = "shared-value";

/// CHX sample workload
#[derive(Parser, Debug)]
#[command(name = "chx-sample")]
#[command(about = "Concurrent workload against a CHX server")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    #[arg(short, long, default_value = chx::config::DEFAULT_ADDR)]
    server: String,

    /// Number of threads sharing the client
    #[arg(short, long, default_value = "10")]
    threads: usize,

    /// set+get pairs per thread
    #[arg(short, long, default_value = "100")]
    operations: usize,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,chx=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    let client = match ChxClient::connect(Some(&args.server)) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(
                "Failed to connect to the CHX server at {}: {}. Please ensure the server is running.",
                args.server,
                e
            );
            std::process::exit(1);
        }
    };
    tracing::info!("Connected to CHX server at {}", client.server_addr());
    tracing::info!(
        "Starting {} threads. Thread 0 will handle the DELETE demonstration.",
        args.threads
    );

    let started = Instant::now();
    let scope_result = crossbeam::thread::scope(|s| {
        for thread_id in 0..args.threads {
            let client = &client;
            let operations = args.operations;
            s.spawn(move |_| {
                if let Err(e) = run_worker(client, thread_id, operations) {
                    tracing::error!("Thread {}: operation failed: {}", thread_id, e);
                }
            });
        }
    });

    if scope_result.is_err() {
        tracing::error!("A worker thread panicked");
    }

    tracing::info!(
        "All threads have completed their tasks in {:?}",
        started.elapsed()
    );

    if let Err(e) = client.close() {
        tracing::warn!("Error closing client: {}", e);
    }
}

fn run_worker(client: &ChxClient, thread_id: usize, operations: usize) -> chx::Result<()> {
    if thread_id == 0 {
        delete_cycle(client)?;
    } else {
        // Give thread 0 a moment to set the key
        thread::sleep(Duration::from_millis(50));
        match client.get(SHARED_KEY)? {
            Some(value) => tracing::info!(
                "Thread {} (GET): found {:?} with value {:?}",
                thread_id,
                SHARED_KEY,
                value
            ),
            None => tracing::info!(
                "Thread {} (GET): {:?} not found (may have been deleted)",
                thread_id,
                SHARED_KEY
            ),
        }
    }

    let mut mismatches = 0;
    for j in 0..operations {
        let key = format!("key-{}-{}", thread_id, j);
        let value = format!("value-{}-{}", thread_id, j);

        client.set(&key, &value)?;
        if client.get(&key)?.as_deref() != Some(value.as_str()) {
            tracing::error!("Thread {}: mismatch for {}", thread_id, key);
            mismatches += 1;
        }
    }

    tracing::debug!(
        "Thread {}: {} operations, {} mismatches",
        thread_id,
        operations,
        mismatches
    );
    Ok(())
}

/// set, verify, delete, verify gone
fn delete_cycle(client: &ChxClient) -> chx::Result<()> {
    client.set(SHARED_KEY, SHARED_VALUE)?;
    tracing::info!("Thread 0 (SET): key={:?}, value={:?}", SHARED_KEY, SHARED_VALUE);

    match client.get(SHARED_KEY)? {
        Some(value) => tracing::info!("Thread 0 (GET before delete): found {:?}", value),
        None => tracing::error!("Thread 0 (GET before delete): {:?} missing", SHARED_KEY),
    }

    client.delete(SHARED_KEY)?;
    tracing::info!("Thread 0 (DELETE): key={:?}", SHARED_KEY);

    match client.get(SHARED_KEY)? {
        None => tracing::info!("Thread 0 (GET after delete): not found as expected"),
        Some(value) => tracing::error!(
            "Thread 0 (GET after delete): value {:?} still present",
            value
        ),
    }
    Ok(())
}
